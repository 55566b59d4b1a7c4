//! The message template sent to every chat.

use std::path::Path;
use tracing::warn;
use wadrive_core::error::WadriveError;

/// Read the message template, trimmed.
///
/// Returns `None` when the file is missing or blank: a run must not start
/// without something to send.
pub fn read_message(path: &Path) -> Result<Option<String>, WadriveError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("message file {} not found", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let message = content.trim();
    if message.is_empty() {
        warn!("message file {} is empty", path.display());
        return Ok(None);
    }
    Ok(Some(message.to_string()))
}
