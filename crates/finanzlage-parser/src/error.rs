//! Error types for finanzlage-parser

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("CSV error in {location}: {message}")]
    Csv {
        location: String,
        message: String,
    },

    #[error("Invalid file pattern: {message}")]
    InvalidPattern { message: String },

    #[error("Failed to write {location}: {message}")]
    Write {
        location: String,
        message: String,
    },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
