use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::domain::model::{PhoneEntry, RunStats};
use crate::domain::ports::OrderSink;
use crate::utils::error::Result;

/// Append-only JSON-lines order history: one record per completed run with
/// the kept entries and their aggregate counts.
#[derive(Debug, Clone)]
pub struct JsonOrderLog {
    path: String,
}

impl JsonOrderLog {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl OrderSink for JsonOrderLog {
    async fn record_order(&self, entries: &[PhoneEntry], stats: &RunStats) -> Result<()> {
        let record = serde_json::json!({
            "recorded_at": chrono::Local::now().to_rfc3339(),
            "stats": stats,
            "entries": entries,
        });

        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        Ok(())
    }
}
