//! # wadrive-ledger
//!
//! The plain-text files a run reads and appends to: message template, chat
//! list, daily processed log, not-found log, scraped chat lists, and the
//! daily photo folder.

pub mod chat_list;
pub mod message;
pub mod not_found;
pub mod photo;
pub mod processed;
pub mod reorganize;
pub mod scraped;
pub mod strip;

#[cfg(test)]
mod tests;

pub use chat_list::{ChatEntry, ChatList};
pub use message::read_message;
pub use not_found::NotFoundLog;
pub use photo::{detect_image_format, find_daily_photo, ImageFormat};
pub use processed::ProcessedLog;
pub use reorganize::{reorder, reorganize, ReorganizeReport, Reordered};
pub use scraped::{render_scraped, scraped_file_name, write_scraped, ChatKind, ScrapedChat};
pub use strip::strip_prefix_in_file;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use wadrive_core::error::WadriveError;

/// Append one line to `path`, creating the file and its parent directory.
pub(crate) fn append_line(path: &Path, line: &str) -> Result<(), WadriveError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
