// Run progress notifications as an explicit publish/subscribe channel.
// Subscribers (badge counters, progress toasts) attach via subscribe();
// repeated events on one topic inside the minimum interval are dropped,
// terminal events always pass.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted,
    InputParsed { accepted: usize, skipped: usize },
    BatchesPacked { batches: usize, total_gb: f64 },
    FileEncoded { name: String },
    RunCompleted { files: usize },
    RunFailed { message: String },
}

impl RunEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            RunEvent::RunStarted => "run",
            RunEvent::InputParsed { .. } => "input",
            RunEvent::BatchesPacked { .. } => "batches",
            RunEvent::FileEncoded { .. } => "files",
            RunEvent::RunCompleted { .. } | RunEvent::RunFailed { .. } => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunEvent::RunCompleted { .. } | RunEvent::RunFailed { .. })
    }
}

pub struct EventBus {
    tx: broadcast::Sender<RunEvent>,
    min_interval: Duration,
    last_published: Mutex<HashMap<&'static str, Instant>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self::with_min_interval(capacity, DEFAULT_MIN_INTERVAL)
    }

    pub fn with_min_interval(capacity: usize, min_interval: Duration) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            min_interval,
            last_published: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.tx.subscribe()
    }

    /// Publish an event, returning false when the per-topic throttle drops it.
    pub fn publish(&self, event: RunEvent) -> bool {
        let topic = event.topic();
        let now = Instant::now();

        if !event.is_terminal() {
            let mut last = match self.last_published.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(previous) = last.get(topic) {
                if now.duration_since(*previous) < self.min_interval {
                    return false;
                }
            }
            last.insert(topic, now);
        }

        // A send only fails with no live receivers; that is not an error here.
        let _ = self.tx.send(event);
        true
    }
}
