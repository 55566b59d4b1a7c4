//! Remove a name prefix from every line of a chat list.

use std::path::Path;
use tracing::info;
use wadrive_core::error::WadriveError;
use wadrive_core::text::remove_prefix_everywhere;

/// Rewrite `path` in place without any occurrence of `prefix`.
///
/// Returns how many occurrences were removed. The file is left untouched
/// when there is nothing to remove.
pub fn strip_prefix_in_file(path: &Path, prefix: &str) -> Result<usize, WadriveError> {
    if prefix.trim().is_empty() {
        return Err(WadriveError::Ledger("prefix must not be empty".into()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| WadriveError::Ledger(format!("failed to read {}: {e}", path.display())))?;
    let (cleaned, removed) = remove_prefix_everywhere(&content, prefix);
    if removed > 0 {
        std::fs::write(path, cleaned)?;
    }
    info!("removed {removed} occurrences of '{prefix}' from {}", path.display());
    Ok(removed)
}
