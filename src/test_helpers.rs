//! Shared test utilities for the pwa-shell test suite.
//!
//! Provides HTML page fixtures and in-memory image encoders, so tests never
//! need binary fixture files on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let html = page_with_body(r#"<img class="icon" src="/a.png">"#);
//! let icon = data_uri("image/png", &png_bytes(10, 10));
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

// =========================================================================
// HTML fixtures
// =========================================================================

/// A minimal HTML document with the given `<head>` content and an empty body.
pub fn page_with_head(head: &str) -> String {
    format!("<!DOCTYPE html><html><head>{head}</head><body></body></html>")
}

/// A minimal HTML document with an empty `<head>` and the given body.
pub fn page_with_body(body: &str) -> String {
    format!("<!DOCTYPE html><html><head></head><body>{body}</body></html>")
}

// =========================================================================
// Image encoders
// =========================================================================

/// A gradient test image so crops are distinguishable from solid fills.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    })
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    gradient(width, height).write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Encode a `width`×`height` PNG in memory.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// Encode a `width`×`height` ICO (single PNG-compressed entry) in memory.
pub fn ico_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Ico)
}

/// Encode a `width`×`height` JPEG in memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let rgb = image::DynamicImage::ImageRgba8(gradient(width, height)).to_rgb8();
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Wrap bytes in a base64 `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode PNG bytes and return their dimensions. Panics on non-PNG input.
pub fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .unwrap_or_else(|e| panic!("expected PNG bytes: {e}"));
    (img.width(), img.height())
}
