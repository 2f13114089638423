//! Error types for finanzlage-core
//!
//! Error codes, severities and user facing suggestions for the
//! aggregation and reconciliation pipeline.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

use finanzlage_config::ConfigError;
use finanzlage_parser::ParseError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Data directory missing
    DataDirectoryNotFound,
    /// Development table missing
    DevelopmentTableMissing,
    /// Alias table maps one name twice
    DuplicateAlias,
    /// Parse error
    ParseError,
    /// Invalid data format
    InvalidFormat,
    /// File not found
    FileNotFound,
    /// Writing output failed
    WriteError,
    /// IO error
    IoError,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::DataDirectoryNotFound => write!(f, "DATA_DIRECTORY_NOT_FOUND"),
            ErrorCode::DevelopmentTableMissing => write!(f, "DEVELOPMENT_TABLE_MISSING"),
            ErrorCode::DuplicateAlias => write!(f, "DUPLICATE_ALIAS"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::WriteError => write!(f, "WRITE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information shown when a run fails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - the run continues with degraded output
    Warning,
    /// Error - the run failed
    Error,
    /// Critical - nothing can run until fixed
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for finanzlage-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Data directory not found: {path}")]
    DataDirectoryNotFound { path: String },

    #[error("Development table not found: {path}")]
    DevelopmentTableMissing { path: String },

    #[error("Duplicate alias entry: {name}")]
    DuplicateAlias { name: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::DataDirectoryNotFound { .. } => ErrorCode::DataDirectoryNotFound,
            CoreError::DevelopmentTableMissing { .. } => ErrorCode::DevelopmentTableMissing,
            CoreError::DuplicateAlias { .. } => ErrorCode::DuplicateAlias,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CoreError::WriteError { .. } => ErrorCode::WriteError,
            CoreError::IoError { .. } => ErrorCode::IoError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::DataDirectoryNotFound { .. } => ErrorSeverity::Critical,
            CoreError::DevelopmentTableMissing { .. } => ErrorSeverity::Critical,
            CoreError::DuplicateAlias { .. } => ErrorSeverity::Critical,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::ParseError { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::FileNotFound { .. } => ErrorSeverity::Error,
            CoreError::WriteError { .. } => ErrorSeverity::Error,
            CoreError::IoError { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::DataDirectoryNotFound { .. } => {
                details = details.with_suggestion(
                    "Check `data.path` in your configuration.".to_string()
                );
            }
            CoreError::DevelopmentTableMissing { path } => {
                details = details.with_detail(serde_json::json!({ "path": path }));
                details = details.with_suggestion(
                    "Create the table with a `Position` column and one row per tracked account.".to_string()
                );
                details = details.with_suggestion(
                    "Check `data.development_file` in your configuration.".to_string()
                );
            }
            CoreError::DuplicateAlias { name } => {
                details = details.with_suggestion(format!(
                    "'{}' appears more than once in `accounts.aliases`, every account and position may be listed once.",
                    name
                ));
            }
            CoreError::ParseError { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "Exports must be `;` separated with a header row.".to_string()
                );
            }
            CoreError::WriteError { .. } => {
                details = details.with_suggestion(
                    "Ensure the data directory is writable.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::IoError { message: error.to_string() }
    }
}

impl From<ParseError> for CoreError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::DirectoryNotFound { path } => CoreError::DataDirectoryNotFound { path },
            ParseError::FileNotFound { path } => CoreError::FileNotFound { path },
            ParseError::Write { location, message } => CoreError::WriteError { path: location, message },
            ParseError::IoError(e) => CoreError::IoError { message: e.to_string() },
            other => CoreError::ParseError { message: other.to_string() },
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(error: ConfigError) -> Self {
        CoreError::ConfigError { message: error.to_string() }
    }
}

// ==================== Tests ====================
