//! The main chat list: readiness, filters, rows and scrolling.

use super::{
    found, selectors,
    wait::{first_child, first_displayed, wait_for_any},
    Automator,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use wadrive_core::{
    error::WadriveError,
    geometry::Rect,
    locator::relative,
    text::truncate,
    traits::{ElementId, SwipeDirection},
};

/// Vertical distance within which a stray unread badge is tied to a row.
const UNREAD_PROXIMITY_PX: f64 = 50.0;

/// Share of a row's height the element swipe moves per step.
const ROW_SWIPE_PERCENT: f64 = 0.25;

/// A chat row currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRow {
    pub element: ElementId,
    pub name: String,
    pub unread: bool,
    pub rect: Rect,
}

/// Result of walking the visible rows for one without unread messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSearch {
    Found {
        row: ElementId,
        name: String,
        /// 1-based on-screen position.
        position: usize,
    },
    /// Every row checked had unread messages; `last_seen` is the last name read.
    Exhausted { last_seen: String },
    /// No rows at all.
    EndOfList,
}

impl Automator<'_> {
    pub async fn is_main_screen(&self) -> Result<bool, WadriveError> {
        Ok(first_displayed(self.device, &selectors::main_screen(self.variant))
            .await?
            .is_some())
    }

    /// Press back once when no main-screen indicator is visible.
    pub async fn ensure_main_screen(&self) -> Result<(), WadriveError> {
        if self.is_main_screen().await? {
            debug!("already on the main screen");
            return Ok(());
        }
        info!("not on the main screen, pressing back");
        self.go_back().await
    }

    /// Back out of chats and search until the main screen shows (at most `max` presses).
    pub async fn return_to_list(&self, max: usize) -> Result<(), WadriveError> {
        for _ in 0..max {
            if self.is_main_screen().await? {
                return Ok(());
            }
            self.go_back().await?;
        }
        Ok(())
    }

    /// Wait for the main screen, then give the list time to fill.
    pub async fn wait_for_chat_list(&self) -> Result<(), WadriveError> {
        let (idx, _) = wait_for_any(
            self.device,
            &selectors::main_screen(self.variant),
            self.pacing.list_timeout,
            self.pacing.poll,
        )
        .await?;
        debug!("main screen indicator #{idx} visible");
        self.pause(self.pacing.settle).await;
        Ok(())
    }

    /// Log what is on screen; used when the chat list cannot be found.
    pub async fn dump_screen(&self) -> Result<(), WadriveError> {
        let texts = found(self.device.find_elements(&selectors::any_text()).await)?
            .unwrap_or_default();
        warn!("screen shows {} text elements", texts.len());
        for (i, element) in texts.iter().take(10).enumerate() {
            let text = found(self.device.text(element).await)?.unwrap_or_default();
            if !text.trim().is_empty() {
                warn!("  text {}: '{}'", i + 1, truncate(text.trim(), 60));
            }
        }
        Ok(())
    }

    /// Pull the list down a little so the filter chips show.
    pub async fn reveal_filters(&self) -> Result<(), WadriveError> {
        let size = self.device.window_size().await?;
        self.device
            .swipe(
                size.at_fraction(0.5, 0.3),
                size.at_fraction(0.5, 0.45),
                Duration::from_millis(300),
            )
            .await?;
        self.pause(self.pacing.short).await;
        Ok(())
    }

    /// Tap the Groups filter. Returns whether it was applied.
    pub async fn select_groups_filter(&self) -> Result<bool, WadriveError> {
        self.reveal_filters().await?;
        for locator in selectors::groups_filter() {
            let Some(chip) = first_displayed(self.device, std::slice::from_ref(&locator)).await?
            else {
                continue;
            };
            if found(self.device.click(&chip).await)?.is_some() {
                info!("Groups filter applied");
                self.pause(self.pacing.settle).await;
                return Ok(true);
            }
        }
        warn!("Groups filter not found, continuing with all chats");
        Ok(false)
    }

    /// Row containers on screen, from the first selector that matches.
    pub async fn row_elements(&self) -> Result<Vec<ElementId>, WadriveError> {
        for locator in selectors::chat_rows(self.variant) {
            let rows = found(self.device.find_elements(&locator).await)?.unwrap_or_default();
            if !rows.is_empty() {
                return Ok(rows);
            }
        }
        Ok(Vec::new())
    }

    /// Name element and text of a row.
    async fn row_name(&self, row: &ElementId) -> Result<Option<(ElementId, String)>, WadriveError> {
        let Some(label) = first_child(self.device, row, &selectors::row_names()).await? else {
            return Ok(None);
        };
        let text = found(self.device.text(&label).await)?.unwrap_or_default();
        let name = text.trim();
        if name.is_empty() {
            return Ok(None);
        }
        Ok(Some((label, name.to_string())))
    }

    async fn has_unread_badge(&self, row: &ElementId) -> Result<bool, WadriveError> {
        let badge = relative(&selectors::unread_badge());
        Ok(found(self.device.find_child(row, &badge).await)?.is_some())
    }

    /// Walk rows `start..=max_rows` for the first one without unread messages.
    pub async fn find_next_without_unread(
        &self,
        start: usize,
        max_rows: usize,
    ) -> Result<RowSearch, WadriveError> {
        let mut last_seen: Option<String> = None;
        for position in start.max(1)..=max_rows {
            let candidates = selectors::chat_row_at(self.variant, position);
            let row = match wait_for_any(
                self.device,
                &candidates,
                self.pacing.element_timeout,
                self.pacing.poll,
            )
            .await
            {
                Ok((_, row)) => row,
                Err(e) if e.is_not_found() => {
                    debug!("no row at position {position}");
                    break;
                }
                Err(e) => return Err(e),
            };

            let Some((_, name)) = self.row_name(&row).await? else {
                debug!("row {position} has no readable name");
                continue;
            };
            last_seen = Some(name.clone());

            if self.has_unread_badge(&row).await? {
                info!("skipping '{name}': unread messages");
                continue;
            }
            return Ok(RowSearch::Found {
                row,
                name,
                position,
            });
        }
        Ok(match last_seen {
            Some(last_seen) => RowSearch::Exhausted { last_seen },
            None => RowSearch::EndOfList,
        })
    }

    /// Every named row on screen, top to bottom.
    ///
    /// A row is unread when it holds a badge, or when any badge on screen
    /// sits within 50 px of the row's name.
    pub async fn visible_rows(&self) -> Result<Vec<ChatRow>, WadriveError> {
        let rows = self.row_elements().await?;
        let badges = found(self.device.find_elements(&selectors::unread_badge()).await)?
            .unwrap_or_default();
        let mut badge_ys = Vec::with_capacity(badges.len());
        for badge in &badges {
            if let Some(rect) = found(self.device.rect(badge).await)? {
                badge_ys.push(rect.y);
            }
        }

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let Some((label, name)) = self.row_name(&row).await? else {
                continue;
            };
            let Some(rect) = found(self.device.rect(&row).await)? else {
                continue;
            };
            let mut unread = self.has_unread_badge(&row).await?;
            if !unread && !badge_ys.is_empty() {
                let name_y = found(self.device.rect(&label).await)?
                    .map(|r| r.y)
                    .unwrap_or(rect.y);
                unread = badge_ys
                    .iter()
                    .any(|y| (y - name_y).abs() <= UNREAD_PROXIMITY_PX);
            }
            out.push(ChatRow {
                element: row,
                name,
                unread,
                rect,
            });
        }
        out.sort_by(|a, b| a.rect.y.total_cmp(&b.rect.y));
        Ok(out)
    }

    pub async fn open_row(&self, row: &ElementId) -> Result<(), WadriveError> {
        self.device.click(row).await?;
        self.pause(self.pacing.step).await;
        Ok(())
    }

    /// One long screen swipe (¾ → ¼ of the height).
    pub async fn scroll_down(&self) -> Result<(), WadriveError> {
        let size = self.device.window_size().await?;
        self.device
            .swipe(
                size.at_fraction(0.5, 0.75),
                size.at_fraction(0.5, 0.25),
                Duration::from_secs(1),
            )
            .await?;
        self.pause(self.pacing.step).await;
        Ok(())
    }

    /// Scroll about `steps` rows, one element swipe on the bottom row per step.
    ///
    /// Falls back to a screen swipe when no row is visible or the gesture fails.
    pub async fn scroll_rows(&self, steps: usize) -> Result<(), WadriveError> {
        for step in 1..=steps {
            let rows = self.row_elements().await?;
            let swiped = match rows.last() {
                Some(bottom) => match self
                    .device
                    .swipe_element(bottom, SwipeDirection::Up, ROW_SWIPE_PERCENT)
                    .await
                {
                    Ok(()) => true,
                    Err(e) if e.is_session_lost() => return Err(e),
                    Err(e) => {
                        debug!("row swipe failed ({e}), using screen swipe");
                        false
                    }
                },
                None => false,
            };
            if !swiped {
                let size = self.device.window_size().await?;
                self.device
                    .swipe(
                        size.at_fraction(0.5, 0.8),
                        size.at_fraction(0.5, 0.2),
                        Duration::from_millis(500),
                    )
                    .await?;
            }
            debug!("scroll step {step}/{steps}");
            self.pause(self.pacing.short).await;
        }
        Ok(())
    }
}
