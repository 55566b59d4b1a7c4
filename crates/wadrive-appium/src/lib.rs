//! Appium driver for wadrive.
//!
//! Talks W3C WebDriver plus Appium's `mobile:` extensions to a UiAutomator2
//! session over HTTP. Docs: <https://github.com/appium/appium-uiautomator2-driver>

mod client;
mod recovery;
mod types;


pub use client::AppiumSession;
pub use recovery::{AppiumConnector, RecoveringDevice, SessionFactory};
pub use types::capabilities;

use wadrive_core::config::{AppVariant, AppiumConfig};
use wadrive_core::error::WadriveError;

/// The device type the binary drives.
pub type AppiumDevice = RecoveringDevice<AppiumConnector>;

/// Connect to the Appium server described by `cfg`.
///
/// When `launch_app_on_session` is set the app's home activity is started
/// as part of session creation.
pub async fn connect(cfg: &AppiumConfig, variant: AppVariant) -> Result<AppiumDevice, WadriveError> {
    let launch = cfg
        .launch_app_on_session
        .then(|| (variant.package(), variant.home_activities()[0]));
    let connector = AppiumConnector::new(cfg, launch)?;
    RecoveringDevice::connect(connector, cfg.max_session_retries, cfg.retry_delay()).await
}
