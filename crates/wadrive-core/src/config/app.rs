use serde::{Deserialize, Serialize};

/// Which WhatsApp build to drive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppVariant {
    /// WhatsApp Business (default).
    #[default]
    Business,
    /// Consumer WhatsApp.
    Personal,
}

impl AppVariant {
    /// Android package name.
    pub fn package(&self) -> &'static str {
        match self {
            Self::Business => "com.whatsapp.w4b",
            Self::Personal => "com.whatsapp",
        }
    }

    /// Home activities to try with `start_activity`, newest layout first.
    pub fn home_activities(&self) -> &'static [&'static str] {
        &[
            "com.whatsapp.home.ui.HomeActivity",
            "com.whatsapp.HomeActivity",
        ]
    }

    /// Launcher icon labels, most common first.
    pub fn launcher_labels(&self) -> &'static [&'static str] {
        match self {
            Self::Business => &["WhatsApp Business", "WA Business", "WhatsApp Biz"],
            Self::Personal => &["WhatsApp", "WA"],
        }
    }

    /// Fully-qualified resource id inside this app, e.g. `com.whatsapp:id/fab`.
    pub fn resource_id(&self, name: &str) -> String {
        format!("{}:id/{name}", self.package())
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Business => "WhatsApp Business",
            Self::Personal => "WhatsApp",
        }
    }
}

impl std::str::FromStr for AppVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "business" | "w4b" => Ok(Self::Business),
            "personal" | "whatsapp" => Ok(Self::Personal),
            other => Err(format!(
                "unknown app variant '{other}' (expected 'business' or 'personal')"
            )),
        }
    }
}
