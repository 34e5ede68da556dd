//! Icon pixel backend trait and shared types.
//!
//! The [`IconBackend`] trait defines the one operation the normalizer needs:
//! cover-fit. It works on in-memory bytes, since icons arrive over HTTP,
//! inside data URIs, or from small local files.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust on top of the
//! `image` crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Unrecognised image format")]
    Unsupported,
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for icon pixel backends.
pub trait IconBackend: Sync {
    /// Decode, cover-fit to a `size`×`size` square, and encode as PNG.
    fn cover_fit(&self, bytes: &[u8], size: u32) -> Result<Vec<u8>, BackendError>;
}
