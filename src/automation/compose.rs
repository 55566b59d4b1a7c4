//! Typing and sending inside an open chat.

use super::{
    found, selectors,
    wait::{first_present, wait_for_any},
    Automator,
};
use tracing::{debug, info, warn};
use wadrive_core::{error::WadriveError, text::truncate, traits::ElementId};

impl Automator<'_> {
    /// Type `message` into the chat entry field and send it.
    pub async fn send_text(&self, message: &str) -> Result<(), WadriveError> {
        let (_, entry) = wait_for_any(
            self.device,
            &[selectors::message_entry()],
            self.pacing.element_timeout,
            self.pacing.poll,
        )
        .await?;
        found(self.device.clear(&entry).await)?;
        self.device.send_keys(&entry, message).await?;
        self.pause(self.pacing.short).await;
        self.press_send().await?;
        info!("sent text: {}", truncate(message, 40));
        Ok(())
    }

    /// Attach the newest gallery photo with `caption` and send it.
    pub async fn send_photo_with_caption(&self, caption: &str) -> Result<(), WadriveError> {
        let (_, attach) = wait_for_any(
            self.device,
            &[selectors::attach_button()],
            self.pacing.element_timeout,
            self.pacing.poll,
        )
        .await?;
        self.device.click(&attach).await?;
        self.pause(self.pacing.step).await;

        let (_, gallery) = wait_for_any(
            self.device,
            &[selectors::gallery()],
            self.pacing.element_timeout,
            self.pacing.poll,
        )
        .await?;
        self.device.click(&gallery).await?;
        self.pause(self.pacing.settle).await;

        self.select_photo().await?;

        let field = self.caption_field().await?;
        found(self.device.clear(&field).await)?;
        self.device.send_keys(&field, caption).await?;
        self.pause(self.pacing.short).await;

        self.press_send().await?;
        info!("sent photo with caption: {}", truncate(caption, 40));
        Ok(())
    }

    async fn press_send(&self) -> Result<(), WadriveError> {
        match first_present(self.device, &[selectors::send_button()]).await? {
            Some(button) => self.device.click(&button).await?,
            None => {
                let point = self.profile.send_button();
                warn!("send button not found, tapping ({}, {})", point.x, point.y);
                self.device.tap(point).await?;
            }
        }
        self.pause(self.pacing.step).await;
        Ok(())
    }

    /// Pick the newest photo, by element or by profile coordinates.
    async fn select_photo(&self) -> Result<(), WadriveError> {
        if let Some(photo) = first_present(self.device, &[selectors::first_gallery_photo()]).await? {
            self.device.click(&photo).await?;
            self.pause(self.pacing.step).await;
            return Ok(());
        }

        warn!("gallery photo not found by element, using profile coordinates");
        self.device.tap(self.profile.photo_select()).await?;
        self.pause(self.pacing.step).await;
        if first_present(self.device, &[selectors::caption(self.variant)])
            .await?
            .is_some()
        {
            return Ok(());
        }

        debug!("primary photo tap missed, trying fallback");
        self.device.tap(self.profile.photo_select_fallback()).await?;
        self.pause(self.pacing.step).await;
        Ok(())
    }

    /// The caption input of the photo preview.
    async fn caption_field(&self) -> Result<ElementId, WadriveError> {
        if let Some(field) = first_present(self.device, &[selectors::caption(self.variant)]).await? {
            return Ok(field);
        }

        let size = self.device.window_size().await?;
        warn!("caption field not found, tapping the caption area");
        self.device.tap(self.profile.caption_area(size)).await?;
        self.pause(self.pacing.short).await;
        if let Some(field) = first_present(self.device, &[selectors::focused_edit_text()]).await? {
            return Ok(field);
        }

        self.device.tap(self.profile.caption_fallback()).await?;
        self.pause(self.pacing.short).await;
        first_present(self.device, &[selectors::focused_edit_text()])
            .await?
            .ok_or_else(|| WadriveError::NoSuchElement("photo caption field".into()))
    }
}
