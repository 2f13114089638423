//! Error types for finanzlage-render

use thiserror::Error;

use finanzlage_parser::ParseError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot create output directory {path}: {message}")]
    OutputDirectory { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Serialization failed: {message}")]
    Serialize { message: String },
}

impl From<serde_json::Error> for RenderError {
    fn from(error: serde_json::Error) -> Self {
        RenderError::Serialize { message: error.to_string() }
    }
}

impl From<ParseError> for RenderError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Write { location, message } => RenderError::Write { path: location, message },
            other => RenderError::Serialize { message: other.to_string() },
        }
    }
}

/// Result type with RenderError
pub type RenderResult<T> = Result<T, RenderError>;
