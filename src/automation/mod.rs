//! Automation flows: what the hands do on the device.
//!
//! Every flow runs against `&dyn Device`, so the same code drives a live
//! Appium session and the scripted fake used in tests.

mod campaign;
mod chat_list;
mod compose;
mod device;
mod launch;
mod photo;
mod scrape;
mod search;
pub(crate) mod selectors;
mod wait;

#[cfg(test)]
pub(crate) mod fake;

pub use campaign::{Campaign, Summary};
pub use chat_list::RowSearch;
pub use photo::{transfer_photo, verify_access};
pub use scrape::ScrapeLimits;

use std::time::Duration;
use wadrive_core::{
    config::{AppVariant, DeviceProfile},
    error::WadriveError,
    traits::Device,
};

/// Delays and timeouts between UI steps.
///
/// The app animates between screens; acting before a transition settles
/// taps the wrong thing.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Between small steps (typing, key presses).
    pub short: Duration,
    /// After a tap that opens a screen.
    pub step: Duration,
    /// For lists and filters to populate.
    pub settle: Duration,
    /// After the app is brought to the foreground.
    pub launch: Duration,
    /// Poll interval of selector waits.
    pub poll: Duration,
    /// How long a single element wait may take.
    pub element_timeout: Duration,
    /// How long the chat list may take to appear.
    pub list_timeout: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(500),
            step: Duration::from_secs(1),
            settle: Duration::from_secs(2),
            launch: Duration::from_secs(3),
            poll: Duration::from_millis(200),
            element_timeout: Duration::from_secs(5),
            list_timeout: Duration::from_secs(10),
        }
    }
}

impl Pacing {
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            short: Duration::ZERO,
            step: Duration::ZERO,
            settle: Duration::ZERO,
            launch: Duration::ZERO,
            poll: Duration::ZERO,
            element_timeout: Duration::ZERO,
            list_timeout: Duration::ZERO,
        }
    }
}

/// Drives one app variant on one device.
pub struct Automator<'a> {
    device: &'a dyn Device,
    variant: AppVariant,
    profile: DeviceProfile,
    pacing: Pacing,
}

impl<'a> Automator<'a> {
    pub fn new(device: &'a dyn Device, variant: AppVariant, profile: DeviceProfile) -> Self {
        Self {
            device,
            variant,
            profile,
            pacing: Pacing::default(),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn device(&self) -> &'a dyn Device {
        self.device
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Turn "nothing matched" into `None`; every other error propagates.
pub(crate) fn found<T>(result: Result<T, WadriveError>) -> Result<Option<T>, WadriveError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
