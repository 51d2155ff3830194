pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::RunConfig;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::core::{engine::BundleEngine, pipeline::BundlePipeline};
pub use crate::utils::error::{BundleError, Result};
