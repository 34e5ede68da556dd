//! Icon normalization: any icon source to a 512×512 PNG, or a placeholder.
//!
//! Normalization is total. Unreachable URLs, missing files, malformed data
//! URIs, undecodable bytes and unsupported formats all degrade to
//! [`ResolvedIcon::Placeholder`], each logged at `warn` with the reason.
//!
//! ```text
//! IconSource ──load──▶ bytes ──cover_fit(512)──▶ PNG
//!      │                 │            │
//!      └─ Unspecified    └─ IconError └─ BackendError ──▶ Placeholder
//! ```

use crate::fetch::{FetchError, Fetcher};
use crate::imaging::{BackendError, IconBackend, RustBackend};
use crate::types::IconSource;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use std::path::PathBuf;
use thiserror::Error;

/// Edge length of the generated icon, in pixels.
pub const ICON_SIZE: u32 = 512;

/// A 1×1 transparent PNG.
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, //
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, //
    0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, //
    0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0x60, 0xf8, 0x5f, //
    0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00, //
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Base64 with or without trailing padding; data URIs in the wild vary.
const DATA_URI_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum IconError {
    #[error("no icon source given")]
    Unspecified,
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed data URI: {0}")]
    DataUri(&'static str),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The icon that ends up at `icons/icon-512x512.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIcon {
    /// A PNG, exactly [`ICON_SIZE`] pixels square.
    Raster { png: Vec<u8> },
    /// The 1×1 transparent sentinel.
    Placeholder,
}

impl ResolvedIcon {
    pub fn png_bytes(&self) -> &[u8] {
        match self {
            ResolvedIcon::Raster { png } => png,
            ResolvedIcon::Placeholder => PLACEHOLDER_PNG,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolvedIcon::Raster { .. } => (ICON_SIZE, ICON_SIZE),
            ResolvedIcon::Placeholder => (1, 1),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedIcon::Placeholder)
    }
}

/// Decode the payload of a base64 `data:` URI.
///
/// The media type is ignored; format detection happens on the bytes.
/// Non-base64 (percent-encoded) data URIs are rejected.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, IconError> {
    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or(IconError::DataUri("missing data: scheme"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(IconError::DataUri("missing comma"))?;
    let is_base64 = header
        .rsplit(';')
        .next()
        .is_some_and(|param| param.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Err(IconError::DataUri("payload is not base64"));
    }
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(DATA_URI_BASE64.decode(compact)?)
}

/// Turns an [`IconSource`] into a [`ResolvedIcon`].
pub struct IconNormalizer<B: IconBackend = RustBackend> {
    fetcher: Fetcher,
    backend: B,
}

impl IconNormalizer {
    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_backend(fetcher, RustBackend::new())
    }
}

impl<B: IconBackend> IconNormalizer<B> {
    pub fn with_backend(fetcher: Fetcher, backend: B) -> Self {
        Self { fetcher, backend }
    }

    /// Normalize an icon source. Never fails.
    pub async fn normalize(&self, source: &IconSource) -> ResolvedIcon {
        if *source == IconSource::Unspecified {
            log::debug!("No icon given, using placeholder");
            return ResolvedIcon::Placeholder;
        }
        match self.try_normalize(source).await {
            Ok(png) => {
                log::debug!("Normalized icon {source} to {ICON_SIZE}x{ICON_SIZE}");
                ResolvedIcon::Raster { png }
            }
            Err(e) => {
                log::warn!("Icon {source} unusable, using placeholder: {e}");
                ResolvedIcon::Placeholder
            }
        }
    }

    /// Load and cover-fit, reporting why it failed.
    pub async fn try_normalize(&self, source: &IconSource) -> Result<Vec<u8>, IconError> {
        let bytes = self.load(source).await?;
        Ok(self.backend.cover_fit(&bytes, ICON_SIZE)?)
    }

    async fn load(&self, source: &IconSource) -> Result<Vec<u8>, IconError> {
        match source {
            IconSource::RemoteUrl(url) => Ok(self.fetcher.bytes(url).await?),
            IconSource::DataUri(uri) => decode_data_uri(uri),
            IconSource::LocalPath(path) => {
                tokio::fs::read(path).await.map_err(|source| IconError::Io {
                    path: path.clone(),
                    source,
                })
            }
            IconSource::Unspecified => Err(IconError::Unspecified),
        }
    }
}
