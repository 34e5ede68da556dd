//! Artifact generation: shell page, web manifest and offline worker.
//!
//! [`Generator::generate`] is a pure function of the [`ProjectSpec`], the
//! [`ResolvedIcon`] and the presentation options it was built with. Identical
//! inputs produce byte-identical artifacts: the cache version is a literal
//! from configuration, never a timestamp.
//!
//! ## Output Structure
//!
//! ```text
//! build/my-app/
//! ├── index.html              # Shell page: full-viewport iframe + worker registration
//! ├── manifest.json           # Web app manifest
//! ├── service-worker.js       # Offline cache worker
//! └── icons/
//!     └── icon-512x512.png    # Normalized icon (or 1×1 placeholder)
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/shell.css`: borderless full-viewport frame
//! - `static/register-sw.js`: worker registration, skipped under `file:`
//! - `static/service-worker.js`: worker template; cache name, asset list and
//!   fallback paths are injected as JSON literals from
//!   [`runtime::strategy`](crate::runtime::strategy), the same constants the
//!   runtime model uses.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! the display name and target URL are escaped automatically.

use crate::config::GeneratorConfig;
use crate::naming::short_name;
use crate::normalize::{ICON_SIZE, ResolvedIcon};
use crate::runtime::strategy::{
    FALLBACK_ICON, ICONS_PREFIX, SHELL_PAGE, STATIC_ASSETS, cache_name,
};
use crate::types::ProjectSpec;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SHELL_FILE: &str = "index.html";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const WORKER_FILE: &str = "service-worker.js";
pub const ICON_FILE: &str = "icons/icon-512x512.png";

/// Every file a project directory contains, relative to it.
pub const PROJECT_FILES: [&str; 4] = [SHELL_FILE, MANIFEST_FILE, WORKER_FILE, ICON_FILE];

const SHELL_CSS: &str = include_str!("../static/shell.css");
const REGISTER_JS: &str = include_str!("../static/register-sw.js");
const WORKER_TEMPLATE: &str = include_str!("../static/service-worker.js");

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The four generated files, in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub shell_markup: String,
    pub manifest_document: String,
    pub worker_script: String,
    pub icon_png: Vec<u8>,
}

/// `manifest.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub orientation: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub purpose: String,
}

/// Renders artifacts with fixed presentation options.
#[derive(Debug, Clone)]
pub struct Generator {
    lang: String,
    shell_theme_color: String,
    background_color: String,
    theme_color: String,
    cache_version: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl Generator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            lang: config.shell.lang.clone(),
            shell_theme_color: config.shell.theme_color.clone(),
            background_color: config.manifest.background_color.clone(),
            theme_color: config.manifest.theme_color.clone(),
            cache_version: config.worker.cache_version.clone(),
        }
    }

    /// Render all artifacts for one project.
    pub fn generate(
        &self,
        spec: &ProjectSpec,
        icon: &ResolvedIcon,
    ) -> Result<Artifacts, GenerateError> {
        if icon.is_placeholder() {
            log::debug!("{}: generating with placeholder icon", spec.display_name);
        }
        Ok(Artifacts {
            shell_markup: self.render_shell(spec).into_string(),
            manifest_document: serde_json::to_string_pretty(&self.manifest(spec))?,
            worker_script: self.render_worker()?,
            icon_png: icon.png_bytes().to_vec(),
        })
    }

    /// Build the manifest document for a project.
    pub fn manifest(&self, spec: &ProjectSpec) -> WebManifest {
        let name = &spec.display_name;
        WebManifest {
            name: name.clone(),
            short_name: short_name(name),
            description: format!("PWA wrapper for {name}"),
            start_url: "/".into(),
            display: "standalone".into(),
            orientation: "portrait".into(),
            background_color: self.background_color.clone(),
            theme_color: self.theme_color.clone(),
            icons: vec![ManifestIcon {
                src: ICON_FILE.into(),
                sizes: format!("{ICON_SIZE}x{ICON_SIZE}"),
                mime_type: "image/png".into(),
                purpose: "any maskable".into(),
            }],
        }
    }

    fn render_shell(&self, spec: &ProjectSpec) -> Markup {
        let register = REGISTER_JS.replace("__WORKER_FILE__", &js_string(WORKER_FILE));
        html! {
            (DOCTYPE)
            html lang=(self.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (spec.display_name) }
                    link rel="manifest" href=(MANIFEST_FILE);
                    link rel="icon" href=(ICON_FILE) type="image/png";
                    meta name="theme-color" content=(self.shell_theme_color);
                    meta http-equiv="Content-Security-Policy" content="frame-ancestors 'self'";
                    style { (PreEscaped(SHELL_CSS)) }
                }
                body {
                    iframe src=(spec.target_url.as_str()) title=(spec.display_name) {}
                    script { (PreEscaped(register)) }
                }
            }
        }
    }

    fn render_worker(&self) -> Result<String, GenerateError> {
        Ok(WORKER_TEMPLATE
            .replace("__CACHE_NAME__", &js_string(&cache_name(&self.cache_version)))
            .replace("__STATIC_ASSETS__", &serde_json::to_string(&STATIC_ASSETS)?)
            .replace("__ICONS_PREFIX__", &js_string(ICONS_PREFIX))
            .replace("__SHELL_PAGE__", &js_string(SHELL_PAGE))
            .replace("__FALLBACK_ICON__", &js_string(FALLBACK_ICON)))
    }
}

/// A JSON string literal, which is also a valid JS string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
