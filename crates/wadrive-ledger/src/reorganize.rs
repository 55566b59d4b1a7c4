//! Reorder the chat list by a priority customer list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::chat_list::parse_line;
use wadrive_core::error::WadriveError;
use wadrive_core::text::{normalize_name, strip_name_prefix};

/// Outcome of a reorganize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorganizeReport {
    pub priority_total: usize,
    /// Chat entries placed in priority order.
    pub matched: usize,
    /// Priority names with no matching chat entry, in priority order.
    pub unmatched_priority: Vec<String>,
    /// Chat entries not on the priority list, appended at the end.
    pub unlisted_chats: usize,
    pub total_written: usize,
    pub output: PathBuf,
}

/// Chat entries in their new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordered {
    pub entries: Vec<String>,
    pub matched: usize,
    pub unmatched_priority: Vec<String>,
}

/// Matching key for a chat entry: bullet and row annotation removed, prefix
/// stripped, then normalized.
fn entry_key(entry: &str, prefix: &str) -> String {
    let name = parse_line(entry).map_or_else(|| entry.trim().to_string(), |e| e.name);
    normalize_name(strip_name_prefix(&name, prefix).unwrap_or(&name))
}

/// Order `entries` by `priority`.
///
/// Entries matching a priority name come first, in priority order; the rest
/// follow in their original order. A priority name listed twice places its
/// entry once.
pub fn reorder(priority: &[String], entries: &[String], prefix: &str) -> Reordered {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        by_key.entry(entry_key(entry, prefix)).or_insert(idx);
    }

    let mut placed = vec![false; entries.len()];
    let mut ordered = Vec::with_capacity(entries.len());
    let mut unmatched_priority = Vec::new();
    for name in priority {
        match by_key.get(&normalize_name(name)) {
            Some(&idx) => {
                if !placed[idx] {
                    placed[idx] = true;
                    ordered.push(entries[idx].clone());
                }
            }
            None => unmatched_priority.push(name.clone()),
        }
    }
    let matched = ordered.len();
    ordered.extend(
        entries
            .iter()
            .zip(&placed)
            .filter(|(_, done)| !**done)
            .map(|(entry, _)| entry.clone()),
    );
    Reordered {
        entries: ordered,
        matched,
        unmatched_priority,
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, WadriveError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| WadriveError::Ledger(format!("failed to read {}: {e}", path.display())))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Write the chat list at `chats` reordered by `priority` to `output`.
pub fn reorganize(
    priority: &Path,
    chats: &Path,
    output: &Path,
    prefix: &str,
) -> Result<ReorganizeReport, WadriveError> {
    let priority_names = read_lines(priority)?;
    let entries = read_lines(chats)?;
    let reordered = reorder(&priority_names, &entries, prefix);

    let mut body = reordered.entries.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    std::fs::write(output, body)?;
    info!(
        "reorganized {} chats into {}",
        reordered.entries.len(),
        output.display()
    );

    Ok(ReorganizeReport {
        priority_total: priority_names.len(),
        matched: reordered.matched,
        unlisted_chats: reordered.entries.len() - reordered.matched,
        total_written: reordered.entries.len(),
        unmatched_priority: reordered.unmatched_priority,
        output: output.to_path_buf(),
    })
}
