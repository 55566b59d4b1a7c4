//! Subcommand handlers. Each returns the report printed to the terminal.

mod device;
mod files;


pub use device::{check, push_photo, scan, scrape, send};
pub use files::{profiles, reorganize, strip_prefix};

use crate::automation::{Automator, Pacing};
use wadrive_core::{
    config::{AppVariant, Config, DeviceProfile},
    traits::Device,
};

/// Config plus the command-line overrides.
pub struct Settings {
    pub cfg: Config,
    pub variant: AppVariant,
    pub profile_name: String,
    pub profile: DeviceProfile,
}

impl Settings {
    /// `variant` and `profile` win over the config file when given.
    pub fn new(cfg: Config, variant: Option<AppVariant>, profile: Option<&str>) -> Self {
        let variant = variant.unwrap_or(cfg.app.variant);
        let (profile_name, profile) = match profile {
            Some(name) => cfg.device.select(name),
            None => cfg.device.active(),
        };
        Self {
            cfg,
            variant,
            profile_name,
            profile,
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            element_timeout: self.cfg.campaign.search_timeout(),
            ..Pacing::default()
        }
    }

    pub fn automator<'a>(&self, device: &'a dyn Device) -> Automator<'a> {
        Automator::new(device, self.variant, self.profile).with_pacing(self.pacing())
    }
}
