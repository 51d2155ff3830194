use clap::Parser;

use crate::config::file::TomlConfig;
use crate::config::RunConfig;
use crate::core::packer::DEFAULT_CAPACITY_GB;
use crate::domain::model::IdentityMode;
use crate::utils::error::{BundleError, Result};

#[derive(Debug, Clone, Parser)]
#[command(name = "bulk-bundle")]
#[command(about = "Batches bulk data-bundle orders into provisioning spreadsheets")]
pub struct CliConfig {
    /// Input file: one `<msisdn> <allocation>[GB]` per line, or a two-column CSV
    pub input: String,

    #[arg(long, help = "Directory the export is written to")]
    pub output_path: Option<String>,

    #[arg(long, help = "Per-file capacity threshold in GB")]
    pub capacity_gb: Option<f64>,

    #[arg(
        long,
        help = "Duplicate identity: number-only (flag and keep) or number-and-allocation (drop repeats)"
    )]
    pub identity_mode: Option<String>,

    #[arg(long, help = "Keep input order when packing instead of sorting by size")]
    pub no_sort: bool,

    #[arg(long, help = "Append an order record to this JSON-lines file after the run")]
    pub order_log: Option<String>,

    #[arg(long, help = "Keep the raw input in this draft file until the run succeeds")]
    pub draft_file: Option<String>,

    #[arg(long, help = "TOML config file; CLI flags take precedence")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolve flags against the optional TOML file and the defaults.
    pub fn into_run_config(self) -> Result<RunConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let batching = file.batching.unwrap_or_default();
        let output = file.output.unwrap_or_default();

        let identity_text = self.identity_mode.or(batching.identity_mode);
        let identity_mode = match identity_text {
            Some(text) => {
                text.parse::<IdentityMode>()
                    .map_err(|reason| BundleError::InvalidConfigValueError {
                        field: "identity_mode".to_string(),
                        value: text.clone(),
                        reason,
                    })?
            }
            None => IdentityMode::default(),
        };

        let sort_before_packing = if self.no_sort {
            false
        } else {
            batching.sort_before_packing.unwrap_or(true)
        };

        Ok(RunConfig {
            input: self.input,
            output_path: self
                .output_path
                .or(output.path)
                .unwrap_or_else(|| "./output".to_string()),
            capacity_gb: self
                .capacity_gb
                .or(batching.capacity_gb)
                .unwrap_or(DEFAULT_CAPACITY_GB),
            identity_mode,
            sort_before_packing,
            order_log: self.order_log.or(output.order_log),
            draft_file: self.draft_file,
        })
    }
}
