//! Daily photo discovery and image sniffing.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wadrive_core::error::WadriveError;

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
        })
    }
}

/// Identify an image by its magic bytes.
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageFormat::Png)
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::WebP)
    } else {
        None
    }
}

fn is_photo(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name == "README.md" {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PHOTO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// The photo to send today: the only image in `dir`.
///
/// With several images the first in name order wins (and a warning is
/// logged). A missing folder or no image means a text-only run.
pub fn find_daily_photo(dir: &Path) -> Result<Option<PathBuf>, WadriveError> {
    if !dir.is_dir() {
        warn!("photo folder {} does not exist", dir.display());
        return Ok(None);
    }
    let mut photos: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_photo(p))
        .collect();
    photos.sort();

    match photos.len() {
        0 => {
            info!("no photo in {}, sending text only", dir.display());
            Ok(None)
        }
        1 => Ok(photos.into_iter().next()),
        n => {
            warn!(
                "{n} photos in {}; using the first. Keep only one photo in the folder.",
                dir.display()
            );
            Ok(photos.into_iter().next())
        }
    }
}
