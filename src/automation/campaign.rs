//! Send runs: the daily message to every target chat.

use super::{photo::transfer_photo, Automator, RowSearch};
use std::collections::HashSet;
use tracing::{info, warn};
use wadrive_core::{config::Config, error::WadriveError, text::truncate, traits::ElementId};
use wadrive_ledger::{find_daily_photo, read_message, ChatList, NotFoundLog, ProcessedLog};

/// Back presses allowed to get from an open chat to the list.
const MAX_BACKS: usize = 3;

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub sent: Vec<String>,
    pub failed: Vec<String>,
    pub not_found: Vec<String>,
    /// Already handled earlier today.
    pub skipped: usize,
    /// Chats that failed earlier today and were tried again.
    pub retried: usize,
    pub with_photo: bool,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sent {} | failed {} | not found {} | skipped {}{}{}",
            self.sent.len(),
            self.failed.len(),
            self.not_found.len(),
            self.skipped,
            if self.retried > 0 {
                format!(" | retried {}", self.retried)
            } else {
                String::new()
            },
            if self.with_photo { " | with photo" } else { "" }
        )
    }
}

/// Message prepared for a run.
struct Payload {
    message: String,
    with_photo: bool,
}

enum Outcome {
    Sent,
    NotFound,
}

/// One send run over the configured files.
pub struct Campaign<'a> {
    auto: &'a Automator<'a>,
    cfg: &'a Config,
    dry_run: bool,
}

impl<'a> Campaign<'a> {
    pub fn new(auto: &'a Automator<'a>, cfg: &'a Config) -> Self {
        Self {
            auto,
            cfg,
            dry_run: false,
        }
    }

    /// Open each chat but send nothing and write no logs.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn read_template(&self) -> Result<String, WadriveError> {
        let path = self.cfg.resolve(&self.cfg.files.message);
        read_message(&path)?.ok_or_else(|| {
            WadriveError::Ledger(format!(
                "no message in {}; nothing to send",
                path.display()
            ))
        })
    }

    /// Unlock, open the app and wait for the chat list.
    async fn setup(&self) -> Result<(), WadriveError> {
        self.auto.unlock(self.cfg.campaign.unlock_swipe).await?;
        self.auto.open_app().await?;
        if let Err(e) = self.auto.wait_for_chat_list().await {
            if !e.is_not_found() {
                return Err(e);
            }
            warn!("chat list not confirmed ({e}); trying back navigation");
            self.auto.ensure_main_screen().await?;
        }
        Ok(())
    }

    /// Redo setup when the session was recreated since `seen`.
    async fn resync(&self, seen: &mut u64) -> Result<(), WadriveError> {
        let current = self.auto.device().generation();
        if current != *seen {
            warn!("automation session was recreated; unlocking and reopening the app");
            self.setup().await?;
            *seen = current;
        }
        Ok(())
    }

    /// Find and push the daily photo. Any failure means a text-only run.
    async fn prepare_photo(&self) -> Result<bool, WadriveError> {
        if !self.cfg.campaign.send_photo || self.dry_run {
            return Ok(false);
        }
        let dir = self.cfg.resolve(&self.cfg.files.photos_dir);
        let Some(photo) = find_daily_photo(&dir)? else {
            return Ok(false);
        };
        match transfer_photo(
            self.auto.device(),
            &photo,
            &self.cfg.campaign.device_photo_path,
        )
        .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_session_lost() => Err(e),
            Err(e) => {
                warn!("photo transfer failed ({e}); sending text only");
                Ok(false)
            }
        }
    }

    async fn prepare(&self) -> Result<Payload, WadriveError> {
        let message = self.read_template()?;
        info!("daily message: {}", truncate(&message, 60));
        self.setup().await?;
        let with_photo = self.prepare_photo().await?;
        Ok(Payload {
            message,
            with_photo,
        })
    }

    async fn send(&self, payload: &Payload) -> Result<(), WadriveError> {
        if self.dry_run {
            return Ok(());
        }
        if payload.with_photo {
            self.auto.send_photo_with_caption(&payload.message).await
        } else {
            self.auto.send_text(&payload.message).await
        }
    }

    fn record(
        &self,
        processed: &mut ProcessedLog,
        summary: &mut Summary,
        name: &str,
        result: Result<(), WadriveError>,
    ) -> Result<(), WadriveError> {
        match result {
            Ok(()) => {
                if !self.dry_run {
                    processed.record_success(name)?;
                }
                info!("sent to '{name}'");
                summary.sent.push(name.to_string());
            }
            Err(e) if e.is_session_lost() => return Err(e),
            Err(e) => {
                warn!("sending to '{name}' failed: {e}");
                if !self.dry_run {
                    processed.record_failure(name)?;
                }
                summary.failed.push(name.to_string());
            }
        }
        Ok(())
    }

    /// Send to every chat in the chat list, found through search.
    pub async fn run_by_name(&self) -> Result<Summary, WadriveError> {
        let chats = ChatList::load(&self.cfg.resolve(&self.cfg.files.chat_names))?;
        let payload = self.prepare().await?;
        let mut processed = ProcessedLog::open_for_today(&self.cfg.resolve(&self.cfg.files.txt_dir))?;
        let not_found = NotFoundLog::new(self.cfg.resolve(&self.cfg.files.not_found_log));
        let prefix = self.cfg.campaign.chat_prefix.as_str();

        let mut summary = Summary {
            with_photo: payload.with_photo,
            ..Summary::default()
        };
        if processed.failed_count() > 0 {
            info!(
                "{} chats failed earlier today and will be retried",
                processed.failed_count()
            );
        }
        let mut generation = self.auto.device().generation();

        for (idx, entry) in chats.iter().enumerate() {
            if processed.contains(&entry.name) {
                summary.skipped += 1;
                continue;
            }
            if processed.has_failed(&entry.name) {
                summary.retried += 1;
            }
            self.resync(&mut generation).await?;
            match entry.row {
                Some(row) => info!("[{}/{}] {} (row {row})", idx + 1, chats.len(), entry.name),
                None => info!("[{}/{}] {}", idx + 1, chats.len(), entry.name),
            }

            match self.send_to(&entry.name, prefix, &payload).await {
                Ok(Outcome::NotFound) => {
                    if !self.dry_run {
                        not_found.append(&entry.name)?;
                    }
                    summary.not_found.push(entry.name.clone());
                }
                Ok(Outcome::Sent) => {
                    self.record(&mut processed, &mut summary, &entry.name, Ok(()))?
                }
                Err(e) => {
                    self.record(&mut processed, &mut summary, &entry.name, Err(e))?;
                    self.auto.return_to_list(MAX_BACKS).await?;
                }
            }
        }

        info!("run finished: {summary}");
        Ok(summary)
    }

    async fn send_to(
        &self,
        name: &str,
        prefix: &str,
        payload: &Payload,
    ) -> Result<Outcome, WadriveError> {
        if !self.auto.open_chat_by_name(name, prefix).await? {
            return Ok(Outcome::NotFound);
        }
        self.send(payload).await?;
        self.auto.return_to_list(MAX_BACKS).await?;
        Ok(Outcome::Sent)
    }

    /// Walk the chat list top to bottom, sending to every row without unread
    /// messages. With `filter`, only rows whose name contains it.
    ///
    /// Each screen handles all but its last visible row, then scrolls that
    /// row to the top.
    pub async fn run_scan(&self, filter: Option<&str>) -> Result<Summary, WadriveError> {
        let payload = self.prepare().await?;
        let mut processed = ProcessedLog::open_for_today(&self.cfg.resolve(&self.cfg.files.txt_dir))?;
        let per_screen = self.cfg.campaign.visible_rows.max(2);

        let mut summary = Summary {
            with_photo: payload.with_photo,
            ..Summary::default()
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut generation = self.auto.device().generation();

        for round in 1..=self.cfg.campaign.max_scrolls.max(1) {
            self.resync(&mut generation).await?;
            let mut fresh = 0;
            let mut position = 0;

            loop {
                let rows = self.auto.visible_rows().await?;
                if position + 1 >= per_screen {
                    if let Some(tracked) = rows.get(position) {
                        info!("tracking '{}' as the next first row", tracked.name);
                    }
                    break;
                }
                let Some(row) = rows.get(position).cloned() else {
                    break;
                };
                position += 1;

                if !seen.insert(row.name.clone()) {
                    continue;
                }
                fresh += 1;

                if !self.wanted(&processed, &mut summary, &row.name, filter) {
                    continue;
                }
                if row.unread {
                    info!("skipping '{}': unread messages", row.name);
                    continue;
                }
                self.send_to_row(&payload, &mut processed, &mut summary, &row.element, &row.name)
                    .await?;
            }

            if fresh == 0 {
                info!("no new chats on screen after {round} rounds; done");
                break;
            }
            self.auto.scroll_rows(per_screen - 1).await?;
        }

        info!("scan finished: {summary}");
        Ok(summary)
    }

    /// Whether a scanned chat still needs the message today.
    fn wanted(
        &self,
        processed: &ProcessedLog,
        summary: &mut Summary,
        name: &str,
        filter: Option<&str>,
    ) -> bool {
        if processed.contains(name) {
            summary.skipped += 1;
            return false;
        }
        filter.map_or(true, |f| name.contains(f))
    }

    /// Open a row from the list, send, record, and get back to the list.
    async fn send_to_row(
        &self,
        payload: &Payload,
        processed: &mut ProcessedLog,
        summary: &mut Summary,
        row: &ElementId,
        name: &str,
    ) -> Result<(), WadriveError> {
        let result = match self.auto.open_row(row).await {
            Ok(()) => self.send(payload).await,
            Err(e) => Err(e),
        };
        let failed = result.is_err();
        self.record(processed, summary, name, result)?;
        if failed {
            self.auto.return_to_list(MAX_BACKS).await
        } else {
            self.auto.go_back().await
        }
    }

    /// Scan by row position instead of reading whole screens: take the next
    /// row without unread messages among the first `visible_rows`, and page
    /// down with long swipes once a screen is used up.
    ///
    /// For list layouts where row bounds cannot be read.
    pub async fn run_positional(&self, filter: Option<&str>) -> Result<Summary, WadriveError> {
        let payload = self.prepare().await?;
        let mut processed = ProcessedLog::open_for_today(&self.cfg.resolve(&self.cfg.files.txt_dir))?;
        let per_screen = self.cfg.campaign.visible_rows.max(1);

        let mut summary = Summary {
            with_photo: payload.with_photo,
            ..Summary::default()
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut generation = self.auto.device().generation();

        for round in 1..=self.cfg.campaign.max_scrolls.max(1) {
            self.resync(&mut generation).await?;
            let mut fresh = 0;
            let mut start = 1;

            while let RowSearch::Found {
                row,
                name,
                position,
            } = self.auto.find_next_without_unread(start, per_screen).await?
            {
                start = position + 1;
                if !seen.insert(name.clone()) {
                    continue;
                }
                fresh += 1;
                if !self.wanted(&processed, &mut summary, &name, filter) {
                    continue;
                }
                self.send_to_row(&payload, &mut processed, &mut summary, &row, &name)
                    .await?;
            }

            if fresh == 0 {
                info!("no new chats on screen after {round} rounds; done");
                break;
            }
            self.auto.scroll_down().await?;
        }

        info!("positional scan finished: {summary}");
        Ok(summary)
    }
}
