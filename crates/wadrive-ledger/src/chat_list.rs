//! Target chat list, one chat per line.

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use wadrive_core::error::WadriveError;

/// One target chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub name: String,
    /// Row number when the line came from a scraped list (`Row N: name`).
    pub row: Option<u32>,
}

/// Ordered, de-duplicated list of target chats.
#[derive(Debug, Clone, Default)]
pub struct ChatList {
    entries: Vec<ChatEntry>,
}

impl ChatList {
    /// Load the chat list from disk.
    pub fn load(path: &Path) -> Result<Self, WadriveError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WadriveError::Ledger(format!("failed to read chat list {}: {e}", path.display()))
        })?;
        let list = Self::parse(&content);
        info!("loaded {} chats from {}", list.len(), path.display());
        Ok(list)
    }

    /// Parse chat-list text. Blank lines and `#` comments are skipped;
    /// a repeated name keeps its first position.
    pub fn parse(content: &str) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for line in content.lines() {
            let Some(entry) = parse_line(line) else {
                continue;
            };
            if seen.insert(entry.name.clone()) {
                entries.push(entry);
            } else {
                debug!("duplicate chat '{}' skipped", entry.name);
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }
}

/// One chat-list line as an entry; `None` for blanks and comments.
///
/// A leading `- ` bullet and a `Row N:` annotation are removed from the name.
pub(crate) fn parse_line(line: &str) -> Option<ChatEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let body = line.strip_prefix("- ").unwrap_or(line).trim_start();
    if let Some((row, name)) = split_row(body) {
        if name.is_empty() {
            return None;
        }
        return Some(ChatEntry {
            name: name.to_string(),
            row: Some(row),
        });
    }
    if body.is_empty() {
        return None;
    }
    Some(ChatEntry {
        name: body.to_string(),
        row: None,
    })
}

/// `Row 12: Name` → `(12, "Name")`.
fn split_row(body: &str) -> Option<(u32, &str)> {
    let rest = body.strip_prefix("Row ")?;
    let (num, name) = rest.split_once(':')?;
    let row = num.trim().parse().ok()?;
    Some((row, name.trim()))
}
