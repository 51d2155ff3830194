pub mod archive;
pub mod dedupe;
pub mod encode;
pub mod engine;
pub mod normalize;
pub mod packer;
pub mod parse;
pub mod pipeline;

pub use crate::domain::model::{
    Batch, ExportFile, IdentityMode, ParsedInput, PhoneEntry, RunOutput, RunStats, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, DraftStore, OrderSink, Pipeline, Storage};
pub use crate::utils::error::Result;
