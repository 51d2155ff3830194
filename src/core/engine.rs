use std::sync::Arc;

use crate::core::Pipeline;
use crate::domain::model::RunOutput;
use crate::utils::error::Result;
use crate::utils::notify::{EventBus, RunEvent};

pub struct BundleEngine<P: Pipeline> {
    pipeline: P,
    events: Option<Arc<EventBus>>,
}

impl<P: Pipeline> BundleEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            events: None,
        }
    }

    pub fn new_with_events(pipeline: P, events: Arc<EventBus>) -> Self {
        Self {
            pipeline,
            events: Some(events),
        }
    }

    fn emit(&self, event: RunEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    pub async fn run(&self) -> Result<RunOutput> {
        tracing::info!("Starting bundle export run");
        self.emit(RunEvent::RunStarted);

        let parsed = match self.pipeline.extract().await {
            Ok(parsed) => parsed,
            Err(e) => return self.fail(e),
        };
        tracing::info!(
            "Parsed {} entries ({} skipped)",
            parsed.lines.len(),
            parsed.skipped
        );
        self.emit(RunEvent::InputParsed {
            accepted: parsed.lines.len(),
            skipped: parsed.skipped,
        });

        let result = match self.pipeline.transform(parsed).await {
            Ok(result) => result,
            Err(e) => return self.fail(e),
        };
        tracing::info!(
            "Packed {} batch(es), {:.2} GB total",
            result.batches.len(),
            result.stats.total_gb
        );
        self.emit(RunEvent::BatchesPacked {
            batches: result.batches.len(),
            total_gb: result.stats.total_gb,
        });

        let output = match self.pipeline.load(result).await {
            Ok(output) => output,
            Err(e) => return self.fail(e),
        };
        for file in &output.files {
            self.emit(RunEvent::FileEncoded {
                name: file.name.clone(),
            });
        }

        tracing::info!(
            "Run complete: {} file(s), saved to {}",
            output.files.len(),
            output.output_path
        );
        self.emit(RunEvent::RunCompleted {
            files: output.files.len(),
        });
        Ok(output)
    }

    fn fail(&self, error: crate::utils::error::BundleError) -> Result<RunOutput> {
        self.emit(RunEvent::RunFailed {
            message: error.to_string(),
        });
        Err(error)
    }
}
