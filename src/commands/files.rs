//! Commands that only touch the text files.

use super::Settings;
use std::fmt::Write as _;
use std::path::Path;
use wadrive_ledger::strip_prefix_in_file;

/// Put priority customers at the top of the chat list.
///
/// The result goes to `output`, or `<chat list>_reorganized.txt` in the txt
/// dir; the chat list itself is left untouched.
pub fn reorganize(settings: &Settings, output: Option<&Path>) -> anyhow::Result<String> {
    let cfg = &settings.cfg;
    let chats = cfg.resolve(&cfg.files.chat_names);
    let output = match output {
        Some(p) => p.to_path_buf(),
        None => {
            let stem = chats
                .file_stem()
                .map_or_else(|| "chat_name".into(), |s| s.to_string_lossy());
            cfg.resolve(&cfg.files.txt_dir)
                .join(format!("{stem}_reorganized.txt"))
        }
    };
    let report = wadrive_ledger::reorganize(
        &cfg.resolve(&cfg.files.priority),
        &chats,
        &output,
        &cfg.campaign.chat_prefix,
    )?;

    let mut out = format!(
        "{} of {} priority customers matched, {} other chats kept\nwrote {} chats to {}",
        report.matched,
        report.priority_total,
        report.unlisted_chats,
        report.total_written,
        report.output.display()
    );
    if !report.unmatched_priority.is_empty() {
        let _ = write!(
            out,
            "\nnot in the chat list: {}",
            report.unmatched_priority.join(", ")
        );
    }
    Ok(out)
}

/// Remove `prefix` from every line of `file` (default: the chat list).
pub fn strip_prefix(
    settings: &Settings,
    prefix: &str,
    file: Option<&Path>,
) -> anyhow::Result<String> {
    let cfg = &settings.cfg;
    let path = file.map_or_else(|| cfg.resolve(&cfg.files.chat_names), Path::to_path_buf);
    let removed = strip_prefix_in_file(&path, prefix)?;
    Ok(format!(
        "removed {removed} occurrences of '{prefix}' from {}",
        path.display()
    ))
}

/// Every device profile with its fallback coordinates; `*` marks the active one.
pub fn profiles(settings: &Settings) -> String {
    let mut out = String::new();
    for (name, p) in settings.cfg.device.all_profiles() {
        let marker = if name == settings.profile_name { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {name:<10} photo ({}, {}) / ({}, {})  caption x{:+} y{} / ({}, {})  send ({}, {})  search ({}, {})",
            p.photo_select_x,
            p.photo_select_y,
            p.photo_select_fallback_x,
            p.photo_select_fallback_y,
            p.caption_area_x_offset,
            p.caption_area_y,
            p.caption_fallback_x,
            p.caption_fallback_y,
            p.send_button_x,
            p.send_button_y,
            p.search_button_x,
            p.search_button_y,
        );
    }
    out
}
