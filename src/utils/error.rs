use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortsError {
    #[error("Failed to connect to database {path}: {source}")]
    ConnectionError {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to migrate database schema: {source}")]
    MigrationError {
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to open file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    FormatError {
        context: String,
        unloc: Option<String>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error upserting port with unloc {unloc}: {source}")]
    UpsertError {
        unloc: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Port store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Setup,
    Input,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PortsError {
    /// 解碼錯誤，若已知目前的 unloc 則附註於訊息中
    pub fn format(unloc: Option<String>, source: serde_json::Error) -> Self {
        let context = match &unloc {
            Some(unloc) => format!("error decoding port data for unloc {}", unloc),
            None => "error reading port file".to_string(),
        };
        PortsError::FormatError {
            context,
            unloc,
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PortsError::ConfigError { .. }
            | PortsError::ConfigValidationError { .. }
            | PortsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PortsError::ConnectionError { .. } | PortsError::MigrationError { .. } => {
                ErrorCategory::Setup
            }
            PortsError::IoError { .. } | PortsError::FormatError { .. } => ErrorCategory::Input,
            PortsError::UpsertError { .. }
            | PortsError::StoreUnavailable { .. }
            | PortsError::SerializationError(_) => ErrorCategory::Storage,
            PortsError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆寫入失敗只記錄，不中止匯入
            PortsError::UpsertError { .. } | PortsError::SerializationError(_) => {
                ErrorSeverity::Low
            }
            PortsError::StoreUnavailable { .. } => ErrorSeverity::Medium,
            PortsError::IoError { .. }
            | PortsError::FormatError { .. }
            | PortsError::ConfigError { .. }
            | PortsError::ConfigValidationError { .. }
            | PortsError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            PortsError::ConnectionError { .. }
            | PortsError::MigrationError { .. }
            | PortsError::ProcessingError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the error aborts an import run instead of being logged and skipped.
    pub fn is_fatal(&self) -> bool {
        self.severity() > ErrorSeverity::Low
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command line flags and the TOML config file",
            ErrorCategory::Setup => "Check that the database path is writable and not locked",
            ErrorCategory::Input => {
                "Check that the ports file exists and is a single JSON object keyed by unloc"
            }
            ErrorCategory::Storage => "Inspect the failing record; other records are unaffected",
            ErrorCategory::Internal => "Re-run the import; report the issue if it persists",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PortsError::IoError { path, .. } => format!("Cannot read ports file '{}'", path),
            PortsError::FormatError {
                unloc: Some(unloc), ..
            } => format!("Port '{}' is malformed: {}", unloc, self),
            PortsError::FormatError { .. } => format!("Ports file is malformed: {}", self),
            PortsError::ConnectionError { path, .. } => {
                format!("Cannot open database '{}'", path)
            }
            PortsError::MigrationError { .. } => "Database schema setup failed".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortsError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("]").unwrap_err()
    }

    #[test]
    fn test_format_error_names_unloc() {
        let err = PortsError::format(Some("AEAJM".to_string()), json_error());
        let message = err.to_string();
        assert!(message.starts_with("error decoding port data for unloc AEAJM: "));
        assert!(message.contains("expected value"));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_format_error_without_unloc() {
        let err = PortsError::format(None, json_error());
        assert!(err.to_string().starts_with("error reading port file: "));
        assert!(err.user_friendly_message().starts_with("Ports file is malformed"));
    }

    #[test]
    fn test_upsert_error_is_not_fatal() {
        let err = PortsError::UpsertError {
            unloc: "AEAJM".to_string(),
            source: rusqlite::Error::QueryReturnedNoRows,
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("AEAJM"));
    }

    #[test]
    fn test_setup_errors_are_critical() {
        let err = PortsError::MigrationError {
            source: rusqlite::Error::InvalidQuery,
        };
        assert_eq!(err.category(), ErrorCategory::Setup);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
