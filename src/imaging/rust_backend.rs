//! Pure Rust icon backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::guess_format` (magic bytes, never file names) |
//! | Decode (PNG, JPEG, GIF, WebP, ICO, BMP, TIFF) | `image` crate (pure Rust decoders) |
//! | Crop | `DynamicImage::crop_imm`, rectangle from [`calculations`](super::calculations) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG | `image::codecs::png` via `DynamicImage::write_to` |
//!
//! ICO files decode to their largest entry. SVG has no decoder here and is
//! reported as unsupported.

use super::backend::{BackendError, IconBackend};
use super::calculations::center_crop_rect;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Formats whose decoders are compiled in (see the `image` features in Cargo.toml).
const DECODABLE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Ico,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Identify the container format from magic bytes.
fn sniff(bytes: &[u8]) -> Result<ImageFormat, BackendError> {
    image::guess_format(bytes)
        .ok()
        .filter(|format| DECODABLE_FORMATS.contains(format) && format.reading_enabled())
        .ok_or(BackendError::Unsupported)
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    let format = sniff(bytes)?;
    image::load_from_memory_with_format(bytes, format).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {format:?}: {e}"))
    })
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img.to_rgba8())
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
    Ok(out.into_inner())
}

impl IconBackend for RustBackend {
    fn cover_fit(&self, bytes: &[u8], size: u32) -> Result<Vec<u8>, BackendError> {
        let img = decode(bytes)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::ProcessingFailed("Image has no pixels".into()));
        }

        // Crop to the target aspect in source space, then resize to the exact square
        let (x, y, w, h) = center_crop_rect((img.width(), img.height()), (size, size));
        let cropped = img.crop_imm(x, y, w, h);
        let resized = cropped.resize_exact(size, size, FilterType::Lanczos3);

        encode_png(&resized)
    }
}
