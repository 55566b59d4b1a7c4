//! Commands that drive the phone.

use super::Settings;
use crate::automation::{
    transfer_photo, verify_access, Automator, Campaign, ScrapeLimits, Summary,
};
use anyhow::Context;
use chrono::Local;
use std::path::Path;
use tracing::info;
use wadrive_ledger::{find_daily_photo, scraped_file_name, write_scraped, ChatKind};

fn report(summary: &Summary, dry_run: bool) -> String {
    let mut out = String::new();
    if dry_run {
        out.push_str("[dry run] ");
    }
    out.push_str(&summary.to_string());
    if !summary.not_found.is_empty() {
        out.push_str(&format!("\nnot found: {}", summary.not_found.join(", ")));
    }
    if !summary.failed.is_empty() {
        out.push_str(&format!("\nfailed: {}", summary.failed.join(", ")));
    }
    out
}

/// Send the daily message to every chat in the chat list.
pub async fn send(settings: &Settings, auto: &Automator<'_>, dry_run: bool) -> anyhow::Result<String> {
    let summary = Campaign::new(auto, &settings.cfg)
        .dry_run(dry_run)
        .run_by_name()
        .await?;
    Ok(report(&summary, dry_run))
}

/// Send to every visible chat without unread messages.
pub async fn scan(
    settings: &Settings,
    auto: &Automator<'_>,
    filter: Option<&str>,
    positional: bool,
) -> anyhow::Result<String> {
    let campaign = Campaign::new(auto, &settings.cfg);
    let summary = if positional {
        campaign.run_positional(filter).await?
    } else {
        campaign.run_scan(filter).await?
    };
    Ok(report(&summary, false))
}

/// Scrape the chat list into `output`, or a timestamped file in the txt dir.
pub async fn scrape(
    settings: &Settings,
    auto: &Automator<'_>,
    output: Option<&Path>,
) -> anyhow::Result<String> {
    let cfg = &settings.cfg;
    auto.unlock(cfg.campaign.unlock_swipe).await?;
    auto.open_app().await?;

    let chats = auto
        .scrape_chats(ScrapeLimits {
            max_scrolls: cfg.scrape.max_scrolls,
            max_empty_scrolls: cfg.scrape.max_empty_scrolls,
            groups_only: cfg.scrape.groups_only,
        })
        .await?;

    let now = Local::now().naive_local();
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => cfg.resolve(&cfg.files.txt_dir).join(scraped_file_name(now)),
    };
    write_scraped(&path, &chats, now)?;

    let groups = chats.iter().filter(|c| c.kind == ChatKind::Group).count();
    Ok(format!(
        "scraped {} chats ({groups} groups, {} individual) into {}",
        chats.len(),
        chats.len() - groups,
        path.display()
    ))
}

/// Connection test: read the screen size and bring the app up.
pub async fn check(settings: &Settings, auto: &Automator<'_>) -> anyhow::Result<String> {
    let size = auto
        .device()
        .window_size()
        .await
        .context("automation session is not responding")?;
    info!("session ok, screen {size}");
    let method = auto.open_app().await?;
    let on_list = auto.is_main_screen().await?;
    Ok(format!(
        "session ok (screen {size}, profile '{}')\n{} opened via {method}\nchat list {}",
        settings.profile_name,
        settings.variant.display_name(),
        if on_list { "visible" } else { "not visible" }
    ))
}

/// Push `path` (or today's photo) to the device and read it back.
pub async fn push_photo(
    settings: &Settings,
    auto: &Automator<'_>,
    path: Option<&Path>,
) -> anyhow::Result<String> {
    let cfg = &settings.cfg;
    let local = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let dir = cfg.resolve(&cfg.files.photos_dir);
            find_daily_photo(&dir)?
                .with_context(|| format!("no photo in {}", dir.display()))?
        }
    };

    let device = auto.device();
    let transfer = transfer_photo(device, &local, &cfg.campaign.device_photo_path).await?;
    let access = verify_access(device, &transfer.device_path).await?;

    let format = access
        .format
        .map(|f| f.to_string())
        .unwrap_or_else(|| "unknown format".into());
    Ok(format!(
        "pushed {} ({} bytes) to {}\nread back: {} bytes, {format}, {}{}",
        local.display(),
        transfer.bytes,
        transfer.device_path,
        access.bytes,
        if transfer.verified { "verified" } else { "size mismatch" },
        if access.in_pictures {
            ""
        } else {
            "\nwarning: outside /sdcard/Pictures, the gallery may not list it"
        }
    ))
}
