//! Shared types passed between the pipeline stages.
//!
//! A generation request arrives as loose strings ([`GenerationRequest`]), is
//! validated into a [`ProjectSpec`], and ends as a [`GenerationResult`] that
//! serializes to the `{ success, projectDir, files }` / `{ success, error }`
//! shape callers expect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Icon argument value meaning "no icon, use the placeholder".
pub const DEFAULT_ICON_ARG: &str = "default";

/// Where the app icon comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// An `http://` or `https://` URL fetched at generation time.
    RemoteUrl(Url),
    /// An inline `data:` URI carrying a base64 payload.
    DataUri(String),
    /// A file on the generating machine.
    LocalPath(PathBuf),
    /// No icon given; always resolves to the placeholder.
    Unspecified,
}

impl IconSource {
    /// Classify a raw icon argument.
    ///
    /// | Input | Source |
    /// |---|---|
    /// | absent, empty, `"default"` | `Unspecified` |
    /// | `http://…`, `https://…` | `RemoteUrl` (or `Unspecified` if unparsable) |
    /// | `data:…` | `DataUri` |
    /// | anything else | `LocalPath` |
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return IconSource::Unspecified;
        };
        if raw == DEFAULT_ICON_ARG {
            return IconSource::Unspecified;
        }
        if has_scheme(raw, "http://") || has_scheme(raw, "https://") {
            return match Url::parse(raw) {
                Ok(url) => IconSource::RemoteUrl(url),
                Err(e) => {
                    log::warn!("Ignoring unparsable icon URL {raw:?}: {e}");
                    IconSource::Unspecified
                }
            };
        }
        if has_scheme(raw, "data:") {
            return IconSource::DataUri(raw.to_string());
        }
        IconSource::LocalPath(PathBuf::from(raw))
    }
}

/// Whether `raw` starts with `scheme`, ignoring ASCII case.
fn has_scheme(raw: &str, scheme: &str) -> bool {
    raw.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

impl fmt::Display for IconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconSource::RemoteUrl(url) => write!(f, "{url}"),
            // Data URIs can be megabytes long; show the media type only.
            IconSource::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                write!(f, "{header},…")
            }
            IconSource::LocalPath(path) => write!(f, "{}", path.display()),
            IconSource::Unspecified => f.write_str(DEFAULT_ICON_ARG),
        }
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    pub target_url: Url,
    pub display_name: String,
    pub icon_source: IconSource,
}

/// A raw generation request, as received from the CLI or a JSON caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Outcome of one generation request.
///
/// Serializes with a `success` discriminator:
///
/// ```json
/// { "success": true, "projectDir": "build/my-app", "files": ["build/my-app/index.html", "…"] }
/// { "success": false, "error": "Missing required parameter: url" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Success {
        success: Succeeded,
        #[serde(rename = "projectDir")]
        project_dir: String,
        files: Vec<String>,
    },
    Failure {
        success: Failed,
        error: String,
    },
}

/// `true` literal for the success variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
pub struct Succeeded;

/// `false` literal for the failure variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
pub struct Failed;

impl From<Succeeded> for bool {
    fn from(_: Succeeded) -> bool {
        true
    }
}

impl TryFrom<bool> for Succeeded {
    type Error = &'static str;
    fn try_from(value: bool) -> Result<Self, Self::Error> {
        if value { Ok(Succeeded) } else { Err("expected success = true") }
    }
}

impl From<Failed> for bool {
    fn from(_: Failed) -> bool {
        false
    }
}

impl TryFrom<bool> for Failed {
    type Error = &'static str;
    fn try_from(value: bool) -> Result<Self, Self::Error> {
        if value { Err("expected success = false") } else { Ok(Failed) }
    }
}

impl GenerationResult {
    pub fn success(project_dir: String, files: Vec<String>) -> Self {
        GenerationResult::Success {
            success: Succeeded,
            project_dir,
            files,
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        GenerationResult::Failure {
            success: Failed,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}
