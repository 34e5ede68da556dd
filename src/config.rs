//! Generator configuration.
//!
//! Settings are loaded from a TOML file layered over stock defaults. The file
//! is optional: without one, every value below applies.
//!
//! ## Config File Location
//!
//! By default `pwa-shell.toml` in the working directory; pass `--config
//! <FILE>` to point elsewhere.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_root = "build"       # Projects land in <output_root>/<slug>/
//!
//! [fetch]
//! timeout_secs = 10           # Bound on every page/icon download
//! user_agent = "Mozilla/5.0 …"
//!
//! [manifest]
//! background_color = "#ffffff"
//! theme_color = "#3498db"
//!
//! [shell]
//! lang = "en"                 # <html lang="…"> of the shell page
//! theme_color = "#ffffff"     # <meta name="theme-color">
//!
//! [worker]
//! cache_version = "v1"        # Bump to evict every cached asset on redeploy
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [worker]
//! cache_version = "v2"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "pwa-shell.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `pwa-shell.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory that receives one subdirectory per generated project.
    pub output_root: String,
    /// Network settings shared by page resolution and icon download.
    pub fetch: FetchConfig,
    /// Colours written into `manifest.json`.
    pub manifest: ManifestConfig,
    /// Shell page settings.
    pub shell: ShellConfig,
    /// Offline worker settings.
    pub worker: WorkerConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_root: "build".to_string(),
            fetch: FetchConfig::default(),
            manifest: ManifestConfig::default(),
            shell: ShellConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_root must not be empty".into(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be at least 1".into(),
            ));
        }
        let version = &self.worker.cache_version;
        if version.is_empty()
            || version
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '`' | '\\'))
        {
            return Err(ConfigError::Validation(
                "worker.cache_version must be non-empty with no whitespace or quotes".into(),
            ));
        }
        for (key, value) in [
            ("manifest.background_color", &self.manifest.background_color),
            ("manifest.theme_color", &self.manifest.theme_color),
            ("shell.theme_color", &self.shell.theme_color),
        ] {
            if !value.starts_with('#') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a #-prefixed colour, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Network settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Upper bound on any single page or icon download, in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request. Many sites serve a
    /// stripped page (or nothing) to unknown agents.
    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Colours written into `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Splash screen background.
    pub background_color: String,
    /// Browser UI tint for the installed app.
    pub theme_color: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            theme_color: "#3498db".to_string(),
        }
    }
}

/// Shell page settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// `lang` attribute of the shell document.
    pub lang: String,
    /// `<meta name="theme-color">` of the shell document.
    pub theme_color: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            theme_color: "#ffffff".to_string(),
        }
    }
}

/// Offline worker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    /// Literal embedded in the worker's cache name (`pwa-cache-<version>`).
    pub cache_version: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_version: "v1".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GeneratorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GeneratorConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GeneratorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    log::debug!("Loaded config from {}", path.display());
    resolve_config(Some(value))
}

/// Load config: an explicit path must exist; otherwise `pwa-shell.toml` in
/// `dir` is used when present, and stock defaults when not.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<GeneratorConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let default_path = dir.join(CONFIG_FILENAME);
    if default_path.exists() {
        return load_config_file(&default_path);
    }
    resolve_config(None)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pwa-shell Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Generated projects are written to <output_root>/<slug>/, where the slug is
# the display name lowercased with whitespace runs replaced by "-".
# Regenerating a project with the same slug overwrites it.
output_root = "build"

# ---------------------------------------------------------------------------
# Network
# ---------------------------------------------------------------------------
[fetch]
# Upper bound, in seconds, on any single page or icon download.
# A timed-out page falls back to the host name as title; a timed-out icon
# falls back to the placeholder.
timeout_secs = 10

# User-Agent sent with every request.
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"

# ---------------------------------------------------------------------------
# manifest.json
# ---------------------------------------------------------------------------
[manifest]
background_color = "#ffffff"
theme_color = "#3498db"

# ---------------------------------------------------------------------------
# Shell page (index.html)
# ---------------------------------------------------------------------------
[shell]
lang = "en"
theme_color = "#ffffff"

# ---------------------------------------------------------------------------
# Offline worker (service-worker.js)
# ---------------------------------------------------------------------------
[worker]
# The worker caches its assets in "pwa-cache-<cache_version>" and deletes
# every other cache on activation. Bump this on redeploy to evict stale
# assets from returning visitors.
cache_version = "v1"
"##
}
