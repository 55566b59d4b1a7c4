mod app;
mod defaults;
mod device;


pub use app::*;
pub use device::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::WadriveError;
use defaults::*;

/// Top-level wadrive configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wadrive: GeneralConfig,
    #[serde(default)]
    pub appium: AppiumConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub campaign: CampaignConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub device: DeviceConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Base directory that relative file paths resolve against.
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for the run log, relative to `work_dir` unless absolute.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            log_level: default_log_level(),
            logs_dir: default_logs_dir(),
        }
    }
}

/// Appium server and session capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppiumConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// adb serial of the target device. Empty = whatever adb picks.
    #[serde(default)]
    pub udid: String,
    #[serde(default)]
    pub platform_version: String,
    #[serde(default = "default_new_command_timeout")]
    pub new_command_timeout_secs: u64,
    #[serde(default = "default_server_launch_timeout")]
    pub server_launch_timeout_ms: u64,
    #[serde(default = "default_server_install_timeout")]
    pub server_install_timeout_ms: u64,
    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// How many times a dropped session is recreated before giving up.
    #[serde(default = "default_max_session_retries")]
    pub max_session_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Launch the app package as part of session creation.
    #[serde(default)]
    pub launch_app_on_session: bool,
}

impl Default for AppiumConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            device_name: default_device_name(),
            udid: String::new(),
            platform_version: String::new(),
            new_command_timeout_secs: default_new_command_timeout(),
            server_launch_timeout_ms: default_server_launch_timeout(),
            server_install_timeout_ms: default_server_install_timeout(),
            request_timeout_secs: default_request_timeout(),
            max_session_retries: default_max_session_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            launch_app_on_session: false,
        }
    }
}

impl AppiumConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Target app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub variant: AppVariant,
}

/// Text files the runs read and append to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_message_file")]
    pub message: String,
    #[serde(default = "default_chat_names_file")]
    pub chat_names: String,
    #[serde(default = "default_photos_dir")]
    pub photos_dir: String,
    /// Directory for the daily processed logs and scraped lists.
    #[serde(default = "default_txt_dir")]
    pub txt_dir: String,
    #[serde(default = "default_not_found_file")]
    pub not_found_log: String,
    #[serde(default = "default_priority_file")]
    pub priority: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            message: default_message_file(),
            chat_names: default_chat_names_file(),
            photos_dir: default_photos_dir(),
            txt_dir: default_txt_dir(),
            not_found_log: default_not_found_file(),
            priority: default_priority_file(),
        }
    }
}

/// Send-run tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Typed in front of each chat-list name when searching. Empty = none.
    #[serde(default)]
    pub chat_prefix: String,
    /// Scan mode: stop after this many scrolls.
    #[serde(default = "default_campaign_max_scrolls")]
    pub max_scrolls: u32,
    /// Rows considered per screen in scan mode; the last one is scrolled to the top.
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
    /// Attach the daily photo when one is present.
    #[serde(default = "default_true")]
    pub send_photo: bool,
    #[serde(default = "default_device_photo_path")]
    pub device_photo_path: String,
    /// Swipe up after waking the screen (needed without a secure lock).
    #[serde(default = "default_true")]
    pub unlock_swipe: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            chat_prefix: String::new(),
            max_scrolls: default_campaign_max_scrolls(),
            visible_rows: default_visible_rows(),
            search_timeout_ms: default_search_timeout_ms(),
            send_photo: true,
            device_photo_path: default_device_photo_path(),
            unlock_swipe: true,
        }
    }
}

impl CampaignConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

/// Chat-list scraper tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_scrape_max_scrolls")]
    pub max_scrolls: u32,
    /// Stop after this many consecutive scrolls that found nothing new.
    #[serde(default = "default_max_empty_scrolls")]
    pub max_empty_scrolls: u32,
    /// Tap the Groups filter before scraping.
    #[serde(default = "default_true")]
    pub groups_only: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_scrolls: default_scrape_max_scrolls(),
            max_empty_scrolls: default_max_empty_scrolls(),
            groups_only: true,
        }
    }
}

impl Config {
    /// Resolve a configured path against `work_dir` (absolute paths and `~` pass through).
    pub fn resolve(&self, path: &str) -> PathBuf {
        let expanded = shellexpand(path);
        let p = Path::new(&expanded);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Path::new(&shellexpand(&self.wadrive.work_dir)).join(p)
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, WadriveError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| WadriveError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, WadriveError> {
    toml::from_str(content)
        .map_err(|e| WadriveError::Config(format!("failed to parse config: {}", e)))
}
