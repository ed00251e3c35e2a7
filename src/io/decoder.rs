//! Image decoder collaborator.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

/// A frame image could not be decoded. Always fatal for a replay run.
#[derive(Debug, Error)]
#[error("Failed to load image at: {}", .path.display())]
pub struct FrameDecodeError {
    pub path: PathBuf,
    pub reason: String,
}

impl FrameDecodeError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Turns an image path into a raster buffer.
pub trait ImageDecoder {
    type Image;

    fn decode(&self, path: &Path) -> Result<Self::Image, FrameDecodeError>;
}

/// Decodes images from disk with the `image` crate, keeping the stored
/// pixel format unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageDecoder;

impl ImageDecoder for FileImageDecoder {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage, FrameDecodeError> {
        let img = image::open(path).map_err(|e| FrameDecodeError::new(path, e.to_string()))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(FrameDecodeError::new(path, "empty image"));
        }
        Ok(img)
    }
}
