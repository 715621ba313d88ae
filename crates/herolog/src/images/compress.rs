//! Client-side downscaling and re-encoding of uploaded images.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::ImageRef;

/// Prefix of every embedded image produced by [`compress`].
const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Settings for [`compress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// Images wider than this are scaled down to exactly this width.
    pub max_width: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: 800,
            quality: 70,
        }
    }
}

/// Target dimensions for an image of `width` x `height`.
///
/// Only shrinks: images at most `max_width` wide keep their size. Otherwise
/// the width becomes `max_width` and the height is scaled by the same ratio
/// (truncated, never below 1).
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = u64::from(height) * u64::from(max_width) / u64::from(width);
    let height = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    (max_width, height)
}

/// Decode `bytes`, downscale if needed and re-encode as an embedded JPEG.
///
/// # Errors
///
/// Returns [`Error::ImageDecode`] if the bytes are not a supported image and
/// [`Error::ImageEncode`] if JPEG encoding fails.
pub fn compress(bytes: &[u8], options: CompressOptions) -> Result<ImageRef> {
    let image = image::load_from_memory(bytes).map_err(|e| Error::image_decode(e.to_string()))?;

    let (width, height) = scaled_dimensions(image.width(), image.height(), options.max_width);
    let image = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, options.quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| Error::image_encode(e.to_string()))?;

    debug!(
        "Compressed image to {}x{} ({} -> {} bytes)",
        width,
        height,
        bytes.len(),
        encoded.len()
    );
    Ok(ImageRef::Embedded(format!(
        "{DATA_URI_PREFIX}{}",
        STANDARD.encode(&encoded)
    )))
}

/// Read an image file and compress it on the blocking pool.
///
/// # Errors
///
/// Returns [`Error::ImageRead`] if the file cannot be read, plus any error
/// from [`compress`].
pub async fn compress_file(path: impl AsRef<Path>, options: CompressOptions) -> Result<ImageRef> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| Error::ImageRead {
            path: path.clone(),
            source,
        })?;

    debug!("Compressing {}", path.display());
    tokio::task::spawn_blocking(move || compress(&bytes, options))
        .await
        .map_err(|e| Error::internal(format!("compression task failed: {e}")))?
}
