//! Bring the app to the foreground.

use super::{found, selectors, wait::first_present, Automator};
use std::time::Duration;
use tracing::{debug, info, warn};
use wadrive_core::{error::WadriveError, geometry::Point};

/// Which step of the launch chain worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMethod {
    ActivateApp,
    StartActivity,
    /// Launcher icon on whatever screen was showing.
    VisibleIcon,
    /// Launcher icon after pressing home.
    HomeScreenIcon,
    AppDrawer,
}

impl std::fmt::Display for LaunchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ActivateApp => "activate app",
            Self::StartActivity => "start activity",
            Self::VisibleIcon => "launcher icon",
            Self::HomeScreenIcon => "home screen icon",
            Self::AppDrawer => "app drawer",
        })
    }
}

impl Automator<'_> {
    /// Open the app, trying each launch method until one works.
    pub async fn open_app(&self) -> Result<LaunchMethod, WadriveError> {
        let package = self.variant.package();
        info!("opening {}", self.variant.display_name());

        match self.device.activate_app(package).await {
            Ok(()) => return self.launched(LaunchMethod::ActivateApp).await,
            Err(e) => skip_failed(LaunchMethod::ActivateApp, e)?,
        }

        for activity in self.variant.home_activities() {
            match self.device.start_activity(package, activity).await {
                Ok(()) => return self.launched(LaunchMethod::StartActivity).await,
                Err(e) => skip_failed(LaunchMethod::StartActivity, e)?,
            }
        }

        if self.tap_launcher_icon().await? {
            return self.launched(LaunchMethod::VisibleIcon).await;
        }

        self.go_home().await?;
        if self.tap_launcher_icon().await? {
            return self.launched(LaunchMethod::HomeScreenIcon).await;
        }

        let size = self.device.window_size().await?;
        let x = size.center_x();
        self.device
            .swipe(
                Point::new(x, size.height - 100),
                Point::new(x, size.height / 2),
                Duration::from_secs(1),
            )
            .await?;
        self.pause(self.pacing.settle).await;
        if self.tap_launcher_icon().await? {
            return self.launched(LaunchMethod::AppDrawer).await;
        }

        Err(WadriveError::Protocol(format!(
            "could not open {}: every launch method failed (is it installed?)",
            self.variant.display_name()
        )))
    }

    async fn launched(&self, method: LaunchMethod) -> Result<LaunchMethod, WadriveError> {
        self.pause(self.pacing.launch).await;
        info!("{} opened via {method}", self.variant.display_name());
        Ok(method)
    }

    async fn tap_launcher_icon(&self) -> Result<bool, WadriveError> {
        for label in self.variant.launcher_labels() {
            let Some(icon) = first_present(self.device, &selectors::launcher_label(label)).await?
            else {
                continue;
            };
            if found(self.device.click(&icon).await)?.is_some() {
                debug!("tapped launcher icon '{label}'");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Log a failed launch step and move on, unless the session itself is gone.
fn skip_failed(method: LaunchMethod, err: WadriveError) -> Result<(), WadriveError> {
    if err.is_session_lost() {
        return Err(err);
    }
    warn!("{method} failed: {err}");
    Ok(())
}
