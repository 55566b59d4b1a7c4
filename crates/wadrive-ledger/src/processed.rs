//! Per-day log of chats already handled.

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wadrive_core::error::WadriveError;

const FAILED_MARK: &str = "FAILED: ";

/// Append-only `processed_chats_YYYY-MM-DD.txt`.
///
/// Successes are written as the bare name and failures as `FAILED: name`.
/// Only successes count as processed, so a later run the same day retries
/// the failures.
#[derive(Debug)]
pub struct ProcessedLog {
    path: PathBuf,
    done: HashSet<String>,
    failed: HashSet<String>,
}

impl ProcessedLog {
    /// Open today's log (local calendar day) inside `dir`.
    pub fn open_for_today(dir: &Path) -> Result<Self, WadriveError> {
        Self::open_for_date(dir, Local::now().date_naive())
    }

    pub fn open_for_date(dir: &Path, date: NaiveDate) -> Result<Self, WadriveError> {
        let path = dir.join(format!("processed_chats_{}.txt", date.format("%Y-%m-%d")));
        let mut done = HashSet::new();
        let mut failed = HashSet::new();
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    match line.strip_prefix(FAILED_MARK) {
                        Some(name) => {
                            failed.insert(name.trim().to_string());
                        }
                        None => {
                            done.insert(line.to_string());
                        }
                    }
                }
                info!(
                    "loaded {} processed chats from {}",
                    done.len(),
                    path.display()
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(WadriveError::Ledger(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        }
        failed.retain(|name| !done.contains(name));
        Ok(Self { path, done, failed })
    }

    /// Whether `name` was sent successfully today.
    pub fn contains(&self, name: &str) -> bool {
        self.done.contains(name)
    }

    /// Whether the latest attempt for `name` today failed.
    pub fn has_failed(&self, name: &str) -> bool {
        self.failed.contains(name)
    }

    pub fn record_success(&mut self, name: &str) -> Result<(), WadriveError> {
        crate::append_line(&self.path, name)?;
        self.failed.remove(name);
        self.done.insert(name.to_string());
        Ok(())
    }

    pub fn record_failure(&mut self, name: &str) -> Result<(), WadriveError> {
        if let Err(e) = crate::append_line(&self.path, &format!("{FAILED_MARK}{name}")) {
            warn!("could not record failure for '{name}': {e}");
            return Err(e);
        }
        self.failed.insert(name.to_string());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chats sent successfully.
    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Chats whose latest attempt failed.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
