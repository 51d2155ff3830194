use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Spreadsheet rendering failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFileError(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Export,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BundleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BundleError::InvalidConfigValueError { .. }
            | BundleError::MissingConfigError { .. }
            | BundleError::ConfigFileError(_) => ErrorCategory::Configuration,
            BundleError::CsvError(_) | BundleError::ProcessingError { .. } => ErrorCategory::Input,
            BundleError::ZipError(_)
            | BundleError::XlsxError(_)
            | BundleError::SerializationError(_) => ErrorCategory::Export,
            BundleError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BundleError::InvalidConfigValueError { .. }
            | BundleError::MissingConfigError { .. }
            | BundleError::ConfigFileError(_) => ErrorSeverity::Medium,
            BundleError::CsvError(_) | BundleError::ProcessingError { .. } => ErrorSeverity::High,
            // No partial file must ever reach the provisioning system.
            BundleError::ZipError(_) | BundleError::XlsxError(_) => ErrorSeverity::High,
            BundleError::SerializationError(_) => ErrorSeverity::High,
            BundleError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {self}"),
            ErrorCategory::Input => format!("Input could not be processed: {self}"),
            ErrorCategory::Export => format!("Export failed, no file was produced: {self}"),
            ErrorCategory::System => format!("System error: {self}"),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BundleError::InvalidConfigValueError { .. } | BundleError::MissingConfigError { .. } => {
                "Check the flag values (or the TOML config file) and re-run"
            }
            BundleError::ConfigFileError(_) => "Fix the TOML syntax in the config file",
            BundleError::CsvError(_) => "Verify the uploaded CSV has a number and an allocation column",
            BundleError::ProcessingError { .. } => "Inspect the input for lines the parser reported",
            BundleError::ZipError(_) | BundleError::XlsxError(_) => {
                "Retry the export; if it persists, reduce the input size"
            }
            BundleError::SerializationError(_) => "Retry the run; the order log entry was not written",
            BundleError::IoError(_) => "Check disk space and permissions on the output directory",
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
