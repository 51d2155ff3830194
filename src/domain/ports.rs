use crate::domain::model::{IdentityMode, ParsedInput, PhoneEntry, RunOutput, RunStats, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn capacity_gb(&self) -> f64;
    fn identity_mode(&self) -> IdentityMode;
    fn sort_before_packing(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ParsedInput>;
    async fn transform(&self, input: ParsedInput) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<RunOutput>;
}

/// Persistence collaborator: receives the kept entries and aggregate counts
/// once a run completes. The pipeline never reads anything back.
pub trait OrderSink: Send + Sync {
    fn record_order(
        &self,
        entries: &[PhoneEntry],
        stats: &RunStats,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Optional convenience cache for unsubmitted input. Callers may wire one in;
/// the pipeline itself never depends on it.
pub trait DraftStore: Send + Sync {
    fn save(&self, content: &str) -> Result<()>;
    fn load(&self) -> Result<Option<String>>;
    fn clear(&self) -> Result<()>;
}
