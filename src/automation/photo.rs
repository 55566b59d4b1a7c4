//! Move the daily photo onto the device.

use std::path::Path;
use tracing::{debug, info, warn};
use wadrive_core::{error::WadriveError, traits::Device};
use wadrive_ledger::{detect_image_format, ImageFormat};

/// Photos above this size are sent, but slowly.
const LARGE_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

const TRANSFER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Where the gallery picks up new pictures.
const PICTURES_DIR: &str = "/sdcard/Pictures/";

/// A completed push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub device_path: String,
    pub bytes: usize,
    /// The file read back from the device had the same size.
    pub verified: bool,
}

/// What the device holds at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessReport {
    pub bytes: usize,
    pub format: Option<ImageFormat>,
    /// Inside the folder the gallery indexes.
    pub in_pictures: bool,
}

/// Push `local` to `device_path` and read it back to check the size.
///
/// A failed read-back only logs a warning; the push itself succeeded.
pub async fn transfer_photo(
    device: &dyn Device,
    local: &Path,
    device_path: &str,
) -> Result<Transfer, WadriveError> {
    let extension = local
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !TRANSFER_EXTENSIONS.contains(&extension.as_str()) {
        return Err(WadriveError::Photo(format!(
            "{} is not a .jpg, .jpeg, .png or .webp file",
            local.display()
        )));
    }
    let meta = std::fs::metadata(local)
        .map_err(|e| WadriveError::Photo(format!("{}: {e}", local.display())))?;
    if meta.len() > LARGE_PHOTO_BYTES {
        warn!(
            "{} is {:.1} MB; large photos transfer slowly",
            local.display(),
            meta.len() as f64 / (1024.0 * 1024.0)
        );
    }

    let size = device.window_size().await?;
    debug!("device reachable ({size})");

    let data = std::fs::read(local)?;
    device.push_file(device_path, &data).await?;
    info!(
        "pushed {} ({} bytes) to {device_path}",
        local.display(),
        data.len()
    );

    let verified = match device.pull_file(device_path).await {
        Ok(back) if back.len() == data.len() => true,
        Ok(back) => {
            warn!(
                "size mismatch after push: sent {} bytes, device has {}",
                data.len(),
                back.len()
            );
            false
        }
        Err(e) => {
            warn!("could not read {device_path} back: {e}");
            false
        }
    };

    Ok(Transfer {
        device_path: device_path.to_string(),
        bytes: data.len(),
        verified,
    })
}

/// Pull `device_path` and report what it holds.
pub async fn verify_access(
    device: &dyn Device,
    device_path: &str,
) -> Result<AccessReport, WadriveError> {
    let bytes = device.pull_file(device_path).await?;
    let format = detect_image_format(&bytes);
    let in_pictures = device_path.starts_with(PICTURES_DIR);
    if !in_pictures {
        warn!("{device_path} is outside {PICTURES_DIR}; the gallery may not show it");
    }
    Ok(AccessReport {
        bytes: bytes.len(),
        format,
        in_pictures,
    })
}
