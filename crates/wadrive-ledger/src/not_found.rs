//! Chats the search could not find.

use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use wadrive_core::error::WadriveError;

/// Append-only `[YYYY-MM-DD HH:MM:SS] name` log.
#[derive(Debug, Clone)]
pub struct NotFoundLog {
    path: PathBuf,
}

impl NotFoundLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, name: &str) -> Result<(), WadriveError> {
        self.append_at(name, Local::now().naive_local())
    }

    pub fn append_at(&self, name: &str, at: NaiveDateTime) -> Result<(), WadriveError> {
        let line = format!("[{}] {name}", at.format("%Y-%m-%d %H:%M:%S"));
        crate::append_line(&self.path, &line)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
