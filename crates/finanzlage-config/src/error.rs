//! Error types for finanzlage-config

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    /// File not found
    FileNotFound,
    /// Invalid YAML format
    InvalidYaml,
    /// Invalid field value
    InvalidValue,
    /// IO error
    IoError,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ConfigErrorCode::InvalidYaml => write!(f, "INVALID_YAML"),
            ConfigErrorCode::InvalidValue => write!(f, "INVALID_VALUE"),
            ConfigErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// What went wrong and where in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    /// Top level YAML section, e.g. `data` or `charts`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Dotted path of the offending key, e.g. `reports.top_items_count`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// 1-based line in the YAML file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ConfigErrorDetails {
    pub fn new(code: ConfigErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            section: None,
            field: None,
            line: None,
            suggestions: vec![],
        }
    }

    /// Record the key path and the section it belongs to
    pub fn with_field(mut self, field: &str) -> Self {
        let section = field.split('.').next().unwrap_or(field);
        self.section = Some(section.to_string());
        self.field = Some(field.to_string());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        match (&self.field, self.line) {
            (Some(field), _) => write!(f, " (at `{}`)", field)?,
            (None, Some(line)) => write!(f, " (line {})", line)?,
            (None, None) => {}
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  hint: {}", suggestion)?;
        }
        Ok(())
    }
}

/// What each configuration section controls, shown next to value errors
fn section_hint(section: &str) -> Option<&'static str> {
    match section {
        "data" => Some(
            "`data` locates the exports: reports are found as `<prefix>_<YYYY>.csv` inside `data.path`.",
        ),
        "reports" => Some("`reports` controls the category tables and the expense breakdown."),
        "accounts" => Some(
            "`accounts.aliases` maps balance sheet accounts to rows of the development table.",
        ),
        "charts" => Some("`charts` sets the y axis step in euros and the series colours."),
        "logging" => Some("`RUST_LOG` overrides `logging.level` when set."),
        _ => None,
    }
}

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigErrorSeverity {
    /// Recoverable, the built-in defaults can be used
    Warning,
    Error,
}

impl std::fmt::Display for ConfigErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorSeverity::Warning => write!(f, "warning"),
            ConfigErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid YAML format: {message}")]
    InvalidYaml { message: String, line: Option<usize> },

    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("IO error reading {path}: {message}")]
    IoError { path: String, message: String },
}

impl ConfigError {
    /// Get the error code
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
            ConfigError::IoError { .. } => ConfigErrorCode::IoError,
        }
    }

    pub fn severity(&self) -> ConfigErrorSeverity {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorSeverity::Warning,
            _ => ConfigErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ConfigErrorDetails {
        let details = ConfigErrorDetails::new(self.code(), self.to_string());

        match self {
            ConfigError::FileNotFound { path } => details
                .with_suggestion(format!("Without {} the built-in defaults are used.", path))
                .with_suggestion("Run `finanzlage default-config > finanzlage.yaml` to create one."),
            ConfigError::InvalidYaml { line, .. } => {
                let details = match line {
                    Some(line) => details.with_line(*line),
                    None => details,
                };
                details.with_suggestion(
                    "Compare the sections with the output of `finanzlage default-config`.",
                )
            }
            ConfigError::InvalidValue { field, reason } => {
                let details = details.with_field(field).with_suggestion(reason.clone());
                match details.section.as_deref().and_then(section_hint) {
                    Some(hint) => details.with_suggestion(hint),
                    None => details,
                }
            }
            ConfigError::IoError { path, .. } => {
                details.with_suggestion(format!("Check that {} is a readable file.", path))
            }
        }
    }
}

/// Result type with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
