//! Collect chat names from the chat list.

use super::{found, selectors, Automator};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use wadrive_core::{
    error::WadriveError,
    text::{is_valid_chat_name, looks_like_group},
};
use wadrive_ledger::{ChatKind, ScrapedChat};

/// Scraper limits.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeLimits {
    pub max_scrolls: u32,
    /// Stop after this many scrolls in a row that found no new chat.
    pub max_empty_scrolls: u32,
    pub groups_only: bool,
}

impl Automator<'_> {
    /// Scroll through the chat list and collect every chat name once.
    pub async fn scrape_chats(&self, limits: ScrapeLimits) -> Result<Vec<ScrapedChat>, WadriveError> {
        self.ensure_main_screen().await?;
        if let Err(e) = self.wait_for_chat_list().await {
            warn!("chat list did not load: {e}");
            self.dump_screen().await?;
            return Err(e);
        }

        let filtered = limits.groups_only && self.select_groups_filter().await?;

        let mut chats: Vec<ScrapedChat> = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();
        let mut seen_positions: HashSet<String> = HashSet::new();
        let mut empty_rounds = 0;

        for attempt in 0..limits.max_scrolls {
            let rows = self.row_elements().await?;
            if rows.is_empty() {
                self.dump_screen().await?;
            }

            let mut fresh = 0;
            for row in &rows {
                // Rows keep their screen slot until the list moves, so only
                // later rounds can repeat a position.
                if attempt > 0 {
                    let Some(rect) = found(self.device.rect(row).await)? else {
                        continue;
                    };
                    if !seen_positions.insert(rect.position_key()) {
                        continue;
                    }
                }
                let Some(label) = found(self.device.find_child(row, &selectors::scraped_name()).await)?
                else {
                    continue;
                };
                let text = found(self.device.text(&label).await)?.unwrap_or_default();
                let name = text.trim();
                if !is_valid_chat_name(name) || seen_names.contains(name) {
                    continue;
                }

                let kind = if filtered || looks_like_group(name) {
                    ChatKind::Group
                } else {
                    ChatKind::Individual
                };
                seen_names.insert(name.to_string());
                chats.push(ScrapedChat {
                    name: name.to_string(),
                    kind,
                    position: chats.len() as u32 + 1,
                });
                debug!("#{:>3}: {name}", chats.len());
                fresh += 1;
            }

            info!(
                "round {}/{}: {} rows, {fresh} new chats",
                attempt + 1,
                limits.max_scrolls,
                rows.len()
            );
            if fresh == 0 {
                empty_rounds += 1;
                if empty_rounds >= limits.max_empty_scrolls {
                    break;
                }
            } else {
                empty_rounds = 0;
            }

            let size = self.device.window_size().await?;
            self.device
                .swipe(
                    size.at_fraction(0.5, 0.7),
                    size.at_fraction(0.5, 0.4),
                    Duration::from_millis(600),
                )
                .await?;
            self.pause(self.pacing.settle).await;

            if self.row_elements().await?.is_empty() {
                info!("no rows after scrolling; end of list");
                break;
            }
        }

        let groups = chats.iter().filter(|c| c.kind == ChatKind::Group).count();
        info!(
            "scraped {} chats ({groups} groups, {} individual)",
            chats.len(),
            chats.len() - groups
        );
        Ok(chats)
    }
}
