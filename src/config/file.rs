use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// Optional TOML run configuration. Every field is optional; CLI flags take
/// precedence over anything set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batching: Option<BatchingConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchingConfig {
    pub capacity_gb: Option<f64>,
    pub identity_mode: Option<String>,
    pub sort_before_packing: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub order_log: Option<String>,
}

impl TomlConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
