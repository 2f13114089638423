//! Writing rendered outputs into the result directory

use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, RenderResult};
use crate::tables::Table;

/// Writes tables and JSON documents into one directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Create the writer, creating the directory if missing
    pub fn new(dir: &Path) -> RenderResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| RenderError::OutputDirectory {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a table as `;` separated CSV
    pub fn write_table(&self, name: &str, table: &Table) -> RenderResult<PathBuf> {
        let content = table.to_csv()?;
        self.write_file(name, &content)
    }

    /// Write a value as pretty printed JSON
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> RenderResult<PathBuf> {
        let content = serde_json::to_string_pretty(value)?;
        self.write_file(name, &content)
    }

    fn write_file(&self, name: &str, content: &str) -> RenderResult<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, content).map_err(|e| RenderError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }
}
