//! Scraped chat-list output.

use chrono::NaiveDateTime;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;
use wadrive_core::error::WadriveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Group,
    Individual,
}

/// A chat read off the chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedChat {
    pub name: String,
    pub kind: ChatKind,
    /// 1-based running position in the list.
    pub position: u32,
}

/// `scraped_chats_YYYYmmdd_HHMMSS.txt`
pub fn scraped_file_name(at: NaiveDateTime) -> String {
    format!("scraped_chats_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

/// Render the scraped list with its header and statistics block.
pub fn render_scraped(chats: &[ScrapedChat], scraped_at: NaiveDateTime) -> String {
    let groups = chats.iter().filter(|c| c.kind == ChatKind::Group).count();
    let individuals = chats.len() - groups;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "# WhatsApp Chat List - Scraped on {}",
        scraped_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "# Total chats: {}\n", chats.len());
    for chat in chats {
        let _ = writeln!(out, "  - Row {}: {}", chat.position, chat.name);
    }
    let _ = writeln!(out, "\n# STATISTICS");
    let _ = writeln!(out, "# Total chats: {}", chats.len());
    let _ = writeln!(out, "# Groups: {groups}");
    let _ = writeln!(out, "# Individual chats: {individuals}");
    out
}

/// Write the scraped list to `path`, replacing any existing file.
pub fn write_scraped(
    path: &Path,
    chats: &[ScrapedChat],
    scraped_at: NaiveDateTime,
) -> Result<(), WadriveError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_scraped(chats, scraped_at))?;
    info!("saved {} scraped chats to {}", chats.len(), path.display());
    Ok(())
}
