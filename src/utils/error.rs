use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Parquet processing error: {0}")]
    ParquetError(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Source parquet not readable: {path}")]
    SourceNotFound { path: String },

    #[error("Schema error: {message}")]
    SchemaError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Config,
    System,
}

impl EtlError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤可重試，不算致命
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::SourceNotFound { .. }
            | EtlError::SchemaError { .. }
            | EtlError::ParquetError(_)
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::SerializationError(_)
            | EtlError::IoError(_)
            | EtlError::TomlError(_)
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::SourceNotFound { .. }
            | EtlError::SchemaError { .. }
            | EtlError::ParquetError(_)
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::TomlError(_)
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Config,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::SourceNotFound { path } => {
                format!("Cannot read source parquet: {path}")
            }
            EtlError::SchemaError { message } => {
                format!("Unexpected data schema: {message}")
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value for '{field}' is invalid: {reason}")
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the --endpoint URL",
            ErrorCategory::Data => {
                "Verify the parquet file exists under --data-dir and has trade_time/date and Close/close columns"
            }
            ErrorCategory::Config => "Run with --help to review flag and config file values",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_maps_to_exit_code_1() {
        let error = EtlError::SourceNotFound {
            path: "data/600869.SH.parquet".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::High);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_categories() {
        let error = EtlError::SchemaError {
            message: "no close column".to_string(),
        };
        assert_eq!(error.category(), ErrorCategory::Data);

        let error = EtlError::MissingConfigError {
            field: "symbol".to_string(),
        };
        assert_eq!(error.category(), ErrorCategory::Config);
    }
}
