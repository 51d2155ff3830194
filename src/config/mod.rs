pub mod file;

#[cfg(feature = "cli")]
pub mod cli;

use crate::core::packer::DEFAULT_CAPACITY_GB;
use crate::domain::model::IdentityMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_float, Validate};

/// Fully resolved run configuration (CLI flags over config file over
/// defaults), the single `ConfigProvider` the pipeline sees.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: String,
    pub output_path: String,
    pub capacity_gb: f64,
    pub identity_mode: IdentityMode,
    pub sort_before_packing: bool,
    pub order_log: Option<String>,
    pub draft_file: Option<String>,
}

impl RunConfig {
    pub fn new(input: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output_path: output_path.into(),
            capacity_gb: DEFAULT_CAPACITY_GB,
            identity_mode: IdentityMode::default(),
            sort_before_packing: true,
            order_log: None,
            draft_file: None,
        }
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn capacity_gb(&self) -> f64 {
        self.capacity_gb
    }

    fn identity_mode(&self) -> IdentityMode {
        self.identity_mode
    }

    fn sort_before_packing(&self) -> bool {
        self.sort_before_packing
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        validate_positive_float("capacity_gb", self.capacity_gb)?;
        Ok(())
    }
}
