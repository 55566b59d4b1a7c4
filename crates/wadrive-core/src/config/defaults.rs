//! Default value functions used by serde for config deserialization.

pub fn default_work_dir() -> String {
    ".".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_logs_dir() -> String {
    "logs".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_server_url() -> String {
    "http://localhost:4723".to_string()
}

pub fn default_device_name() -> String {
    "Android Device".to_string()
}

pub fn default_new_command_timeout() -> u64 {
    300
}

pub fn default_server_launch_timeout() -> u64 {
    60_000
}

pub fn default_server_install_timeout() -> u64 {
    60_000
}

pub fn default_request_timeout() -> u64 {
    60
}

pub fn default_max_session_retries() -> u32 {
    3
}

pub fn default_retry_delay_ms() -> u64 {
    2_000
}

pub fn default_message_file() -> String {
    "daily_message.txt".to_string()
}

pub fn default_chat_names_file() -> String {
    "txt/chat_name.txt".to_string()
}

pub fn default_photos_dir() -> String {
    "daily_photos".to_string()
}

pub fn default_txt_dir() -> String {
    "txt".to_string()
}

pub fn default_not_found_file() -> String {
    "txt/not_found_chats.txt".to_string()
}

pub fn default_priority_file() -> String {
    "txt/priority_customers.txt".to_string()
}

pub fn default_campaign_max_scrolls() -> u32 {
    15
}

pub fn default_visible_rows() -> usize {
    7
}

pub fn default_search_timeout_ms() -> u64 {
    5_000
}

pub fn default_device_photo_path() -> String {
    "/sdcard/Pictures/whatsapp_daily_poster.jpg".to_string()
}

pub fn default_scrape_max_scrolls() -> u32 {
    30
}

pub fn default_max_empty_scrolls() -> u32 {
    3
}

pub fn default_profile() -> String {
    "default".to_string()
}
