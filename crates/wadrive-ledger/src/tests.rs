use super::*;
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

fn at(h: u32, m: u32, s: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ---------------------------------------------------------------------------
// message
// ---------------------------------------------------------------------------

#[test]
fn test_read_message_trims() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("daily_message.txt");
    fs::write(&path, "\n  Namaste! Today's offer\nline two  \n\n").unwrap();
    assert_eq!(
        read_message(&path).unwrap().as_deref(),
        Some("Namaste! Today's offer\nline two")
    );
}

#[test]
fn test_read_message_missing_or_blank() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("daily_message.txt");
    assert_eq!(read_message(&path).unwrap(), None);
    fs::write(&path, "  \n\t\n").unwrap();
    assert_eq!(read_message(&path).unwrap(), None);
}

// ---------------------------------------------------------------------------
// chat list
// ---------------------------------------------------------------------------

#[test]
fn test_chat_list_parse() {
    let list = ChatList::parse(
        "# WhatsApp Chat List\n\
         \n\
         Ram Shop\n\
         \x20 - Row 4: Sita Traders\n\
         Row 7: Hari\n\
         Ram Shop\n\
         Row x: literal\n",
    );
    let entries = list.entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries[0],
        ChatEntry {
            name: "Ram Shop".into(),
            row: None
        }
    );
    assert_eq!(entries[1].name, "Sita Traders");
    assert_eq!(entries[1].row, Some(4));
    assert_eq!(entries[2].name, "Hari");
    assert_eq!(entries[2].row, Some(7));
    assert_eq!(entries[3].name, "Row x: literal");
}

#[test]
fn test_chat_list_bullet_without_row() {
    let list = ChatList::parse("- Sita\n  -   Hari Traders\nRam\n");
    let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Sita", "Hari Traders", "Ram"]);
    assert!(list.iter().all(|e| e.row.is_none()));
}

#[test]
fn test_chat_list_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = ChatList::load(&dir.path().join("nope.txt")).unwrap_err();
    assert!(err.to_string().contains("chat list"));
}

#[test]
fn test_chat_list_reads_scraped_output() {
    let chats = vec![
        ScrapedChat {
            name: "Family".into(),
            kind: ChatKind::Group,
            position: 1,
        },
        ScrapedChat {
            name: "Ram".into(),
            kind: ChatKind::Individual,
            position: 2,
        },
    ];
    let list = ChatList::parse(&render_scraped(&chats, at(9, 0, 0)));
    let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Family", "Ram"]);
}

// ---------------------------------------------------------------------------
// processed log
// ---------------------------------------------------------------------------

#[test]
fn test_processed_log_file_name_and_round_trip() {
    let dir = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let mut log = ProcessedLog::open_for_date(dir.path(), date).unwrap();
    assert!(log.is_empty());
    assert!(log
        .path()
        .ends_with("processed_chats_2025-03-14.txt"));

    log.record_success("Ram").unwrap();
    log.record_failure("Sita").unwrap();
    assert!(log.contains("Ram"));
    assert!(!log.contains("Sita"));

    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content, "Ram\nFAILED: Sita\n");

    let reopened = ProcessedLog::open_for_date(dir.path(), date).unwrap();
    assert!(reopened.contains("Ram"));
    assert!(!reopened.contains("Sita"), "failed chats are retried");
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.failed_count(), 1);
    assert!(reopened.has_failed("Sita"));
    assert!(!reopened.has_failed("Ram"));
}

#[test]
fn test_processed_log_success_after_failure() {
    let dir = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let mut log = ProcessedLog::open_for_date(dir.path(), date).unwrap();
    log.record_failure("Sita").unwrap();
    log.record_success("Sita").unwrap();
    assert_eq!(log.failed_count(), 0);

    let reopened = ProcessedLog::open_for_date(dir.path(), date).unwrap();
    assert!(reopened.contains("Sita"));
    assert_eq!(reopened.failed_count(), 0);
}

#[test]
fn test_processed_log_is_per_day() {
    let dir = TempDir::new().unwrap();
    let d1 = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let d2 = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let mut log = ProcessedLog::open_for_date(dir.path(), d1).unwrap();
    log.record_success("Ram").unwrap();
    let tomorrow = ProcessedLog::open_for_date(dir.path(), d2).unwrap();
    assert!(!tomorrow.contains("Ram"));
}

#[test]
fn test_processed_log_creates_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("txt");
    let mut log = ProcessedLog::open_for_today(&nested).unwrap();
    log.record_success("Ram").unwrap();
    assert!(log.path().exists());
}

// ---------------------------------------------------------------------------
// not-found log
// ---------------------------------------------------------------------------

#[test]
fn test_not_found_log_format() {
    let dir = TempDir::new().unwrap();
    let log = NotFoundLog::new(dir.path().join("txt/not_found_chats.txt"));
    log.append_at("Ram Shop", at(8, 5, 9)).unwrap();
    log.append_at("Sita", at(8, 6, 0)).unwrap();
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(
        content,
        "[2025-03-14 08:05:09] Ram Shop\n[2025-03-14 08:06:00] Sita\n"
    );
}

// ---------------------------------------------------------------------------
// scraped
// ---------------------------------------------------------------------------

#[test]
fn test_scraped_file_name() {
    assert_eq!(
        scraped_file_name(at(13, 4, 5)),
        "scraped_chats_20250314_130405.txt"
    );
}

#[test]
fn test_write_scraped_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/scraped.txt");
    let chats = vec![
        ScrapedChat {
            name: "Office work crew".into(),
            kind: ChatKind::Group,
            position: 1,
        },
        ScrapedChat {
            name: "Ram".into(),
            kind: ChatKind::Individual,
            position: 2,
        },
    ];
    write_scraped(&path, &chats, at(13, 4, 5)).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "# WhatsApp Chat List - Scraped on 2025-03-14 13:04:05\n\
         # Total chats: 2\n\
         \n\
         \x20 - Row 1: Office work crew\n\
         \x20 - Row 2: Ram\n\
         \n\
         # STATISTICS\n\
         # Total chats: 2\n\
         # Groups: 1\n\
         # Individual chats: 1\n"
    );
}

// ---------------------------------------------------------------------------
// reorganize
// ---------------------------------------------------------------------------

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_reorder_by_priority() {
    let entries = strings(&["Shop Ram", "Shop Sita", "Shop Hari", "Gita"]);
    let priority = strings(&["hari", "Nobody", "R a m", "hari"]);
    let result = reorder(&priority, &entries, "Shop");
    assert_eq!(
        result.entries,
        strings(&["Shop Hari", "Shop Ram", "Shop Sita", "Gita"])
    );
    assert_eq!(result.matched, 2);
    assert_eq!(result.unmatched_priority, strings(&["Nobody"]));
}

#[test]
fn test_reorder_without_prefix() {
    let entries = strings(&["Ram", "Sita"]);
    let result = reorder(&strings(&["sita"]), &entries, "");
    assert_eq!(result.entries, strings(&["Sita", "Ram"]));
}

#[test]
fn test_reorder_scraped_entries() {
    let entries = strings(&["- Row 1: Sita", "- Row 2: Shop Ram", "Hari"]);
    let result = reorder(&strings(&["Ram", "hari"]), &entries, "Shop");
    assert_eq!(
        result.entries,
        strings(&["- Row 2: Shop Ram", "Hari", "- Row 1: Sita"])
    );
    assert_eq!(result.matched, 2);
    assert!(result.unmatched_priority.is_empty());
}

#[test]
fn test_reorganize_files() {
    let dir = TempDir::new().unwrap();
    let priority = dir.path().join("priority.txt");
    let chats = dir.path().join("chat_name.txt");
    let output = dir.path().join("chat_name_reorganized.txt");
    fs::write(&priority, "Sita\n\nMissing\n").unwrap();
    fs::write(&chats, "Shop Ram\nShop Sita\n").unwrap();

    let report = reorganize(&priority, &chats, &output, "Shop").unwrap();
    assert_eq!(report.priority_total, 2);
    assert_eq!(report.matched, 1);
    assert_eq!(report.unlisted_chats, 1);
    assert_eq!(report.total_written, 2);
    assert_eq!(report.unmatched_priority, strings(&["Missing"]));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Shop Sita\nShop Ram\n"
    );
}

// ---------------------------------------------------------------------------
// strip prefix
// ---------------------------------------------------------------------------

#[test]
fn test_strip_prefix_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat_name.txt");
    fs::write(&path, "NepalWin 🇳🇵Ram\nNepalWin🇳🇵 Sita\nHari\n").unwrap();
    let removed = strip_prefix_in_file(&path, "NepalWin 🇳🇵").unwrap();
    assert_eq!(removed, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "Ram\nSita\nHari\n");
}

#[test]
fn test_strip_prefix_rejects_empty_prefix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat_name.txt");
    fs::write(&path, "Ram\n").unwrap();
    assert!(strip_prefix_in_file(&path, "  ").is_err());
}

// ---------------------------------------------------------------------------
// photo
// ---------------------------------------------------------------------------

#[test]
fn test_detect_image_format() {
    assert_eq!(
        detect_image_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]),
        Some(ImageFormat::Jpeg)
    );
    assert_eq!(
        detect_image_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0]),
        Some(ImageFormat::Png)
    );
    assert_eq!(
        detect_image_format(b"RIFF\x10\x00\x00\x00WEBPVP8 "),
        Some(ImageFormat::WebP)
    );
    assert_eq!(detect_image_format(b"RIFF\x10\x00\x00\x00WAVE"), None);
    assert_eq!(detect_image_format(b"GIF89a"), None);
    assert_eq!(detect_image_format(&[]), None);
}

#[test]
fn test_find_daily_photo_single() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("poster.JPG"), b"x").unwrap();
    fs::write(dir.path().join("README.md"), b"x").unwrap();
    fs::write(dir.path().join(".hidden.png"), b"x").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    let found = find_daily_photo(dir.path()).unwrap().unwrap();
    assert_eq!(found.file_name().unwrap(), "poster.JPG");
}

#[test]
fn test_find_daily_photo_several_uses_first_sorted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.png"), b"x").unwrap();
    fs::write(dir.path().join("a.jpeg"), b"x").unwrap();
    let found = find_daily_photo(dir.path()).unwrap().unwrap();
    assert_eq!(found.file_name().unwrap(), "a.jpeg");
}

#[test]
fn test_find_daily_photo_none() {
    let dir = TempDir::new().unwrap();
    assert_eq!(find_daily_photo(dir.path()).unwrap(), None);
    assert_eq!(find_daily_photo(&dir.path().join("missing")).unwrap(), None);
}
