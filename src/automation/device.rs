//! Screen wake, unlock and system navigation.

use super::Automator;
use std::time::Duration;
use tracing::{debug, info};
use wadrive_core::{
    error::WadriveError,
    geometry::{Point, WindowSize},
    traits::keycode,
};

impl Automator<'_> {
    /// Wake the screen and, with `swipe`, dismiss a swipe-up lock screen.
    ///
    /// A secure lock (PIN, pattern) is not handled; such devices must be
    /// unlocked by hand.
    pub async fn unlock(&self, swipe: bool) -> Result<WindowSize, WadriveError> {
        self.device.press_keycode(keycode::WAKEUP).await?;
        self.pause(self.pacing.step).await;

        let size = self.device.window_size().await?;
        info!("screen active ({size})");

        if swipe {
            let x = size.center_x();
            self.device
                .swipe(
                    Point::new(x, size.height - 200),
                    Point::new(x, size.height / 3),
                    Duration::from_millis(800),
                )
                .await?;
            self.pause(self.pacing.step).await;
        }

        // A second wake plus a tap in the corner keeps the screen from dimming.
        self.device.press_keycode(keycode::WAKEUP).await?;
        self.device.tap(Point::new(50, 50)).await?;
        debug!("device unlocked");
        Ok(size)
    }

    pub async fn go_home(&self) -> Result<(), WadriveError> {
        self.device.press_keycode(keycode::HOME).await?;
        self.pause(self.pacing.short).await;
        Ok(())
    }

    pub async fn go_back(&self) -> Result<(), WadriveError> {
        self.device.press_keycode(keycode::BACK).await?;
        self.pause(self.pacing.step).await;
        Ok(())
    }
}
