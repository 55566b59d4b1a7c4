//! Per-device pixel coordinates used when element lookup fails.

use super::defaults::default_profile;
use crate::geometry::{Point, WindowSize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Fallback tap targets for one device model.
///
/// Field names match the flat keys used in `[device.profiles.<name>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// First photo tile in the gallery picker.
    pub photo_select_x: i64,
    pub photo_select_y: i64,
    /// Second guess for the first photo tile.
    pub photo_select_fallback_x: i64,
    pub photo_select_fallback_y: i64,
    /// Caption field, x as an offset from the screen centre.
    pub caption_area_x_offset: i64,
    pub caption_area_y: i64,
    pub caption_fallback_x: i64,
    pub caption_fallback_y: i64,
    pub send_button_x: i64,
    pub send_button_y: i64,
    /// Search icon in the chat list toolbar.
    pub search_button_x: i64,
    pub search_button_y: i64,
}

impl DeviceProfile {
    pub fn photo_select(&self) -> Point {
        Point::new(self.photo_select_x, self.photo_select_y)
    }

    pub fn photo_select_fallback(&self) -> Point {
        Point::new(self.photo_select_fallback_x, self.photo_select_fallback_y)
    }

    pub fn caption_area(&self, size: WindowSize) -> Point {
        Point::new(size.center_x() + self.caption_area_x_offset, self.caption_area_y)
    }

    pub fn caption_fallback(&self) -> Point {
        Point::new(self.caption_fallback_x, self.caption_fallback_y)
    }

    pub fn send_button(&self) -> Point {
        Point::new(self.send_button_x, self.send_button_y)
    }

    pub fn search_button(&self) -> Point {
        Point::new(self.search_button_x, self.search_button_y)
    }
}

/// Profiles shipped with the binary.
pub fn builtin_profiles() -> BTreeMap<String, DeviceProfile> {
    let mut map = BTreeMap::new();
    // 1080x2400 class (most current mid-range phones).
    map.insert(
        "default".to_string(),
        DeviceProfile {
            photo_select_x: 180,
            photo_select_y: 560,
            photo_select_fallback_x: 540,
            photo_select_fallback_y: 560,
            caption_area_x_offset: -100,
            caption_area_y: 2200,
            caption_fallback_x: 400,
            caption_fallback_y: 2180,
            send_button_x: 990,
            send_button_y: 2250,
            search_button_x: 860,
            search_button_y: 150,
        },
    );
    // 720x1600 class.
    map.insert(
        "compact".to_string(),
        DeviceProfile {
            photo_select_x: 120,
            photo_select_y: 380,
            photo_select_fallback_x: 360,
            photo_select_fallback_y: 380,
            caption_area_x_offset: -70,
            caption_area_y: 1460,
            caption_fallback_x: 270,
            caption_fallback_y: 1450,
            send_button_x: 660,
            send_button_y: 1500,
            search_button_x: 575,
            search_button_y: 100,
        },
    );
    // 1080x2340 with a taller status bar.
    map.insert(
        "tall".to_string(),
        DeviceProfile {
            photo_select_x: 180,
            photo_select_y: 600,
            photo_select_fallback_x: 540,
            photo_select_fallback_y: 600,
            caption_area_x_offset: -100,
            caption_area_y: 2130,
            caption_fallback_x: 400,
            caption_fallback_y: 2110,
            send_button_x: 990,
            send_button_y: 2190,
            search_button_x: 860,
            search_button_y: 185,
        },
    );
    map
}

/// Device section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Name of the profile to use.
    #[serde(default = "default_profile")]
    pub profile: String,
    /// User-defined profiles; these shadow built-ins with the same name.
    #[serde(default)]
    pub profiles: BTreeMap<String, DeviceProfile>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            profiles: BTreeMap::new(),
        }
    }
}

impl DeviceConfig {
    /// Every known profile, user-defined ones taking precedence.
    pub fn all_profiles(&self) -> BTreeMap<String, DeviceProfile> {
        let mut all = builtin_profiles();
        for (name, profile) in &self.profiles {
            all.insert(name.clone(), *profile);
        }
        all
    }

    /// Look up `name`, falling back to `default` when it is unknown.
    pub fn select(&self, name: &str) -> (String, DeviceProfile) {
        let all = self.all_profiles();
        if let Some(profile) = all.get(name) {
            return (name.to_string(), *profile);
        }
        warn!("unknown device profile '{name}', using 'default'");
        let fallback = all
            .get("default")
            .copied()
            .unwrap_or_else(|| builtin_profiles()["default"]);
        ("default".to_string(), fallback)
    }

    /// The configured profile.
    pub fn active(&self) -> (String, DeviceProfile) {
        self.select(&self.profile)
    }
}
