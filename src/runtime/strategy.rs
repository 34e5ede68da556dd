//! Request classification shared by the runtime model and the generated worker.
//!
//! All paths are relative to the worker's registration scope: `/` is the
//! scope root, wherever the project is hosted.

/// Prefix of every cache this worker family creates.
pub const CACHE_PREFIX: &str = "pwa-cache-";

pub const SCOPE_ROOT: &str = "/";
pub const SHELL_PAGE: &str = "/index.html";
pub const MANIFEST: &str = "/manifest.json";
pub const ICONS_PREFIX: &str = "/icons/";
/// The icon served when an icon request cannot be satisfied.
pub const FALLBACK_ICON: &str = "/icons/icon-512x512.png";

/// Precached on install, in this order.
pub const STATIC_ASSETS: [&str; 4] = [SCOPE_ROOT, SHELL_PAGE, MANIFEST, FALLBACK_ICON];

/// Cache name for a version literal: `pwa-cache-<version>`.
pub fn cache_name(version: &str) -> String {
    format!("{CACHE_PREFIX}{version}")
}

/// How a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Cache, then network (stored on 2xx), then the offline fallback.
    CacheFirst,
    /// Network, then a matching cache entry (GET only), then the shell page.
    NetworkFirst,
}

/// Whether a path is a precached asset or lives under the icon directory.
pub fn is_static_asset(path: &str) -> bool {
    STATIC_ASSETS.contains(&path) || path.starts_with(ICONS_PREFIX)
}

/// Pick the strategy for a request. Only `GET` is ever cache-first.
pub fn classify(method: &str, path: &str) -> Strategy {
    if method.eq_ignore_ascii_case("GET") && is_static_asset(path) {
        Strategy::CacheFirst
    } else {
        Strategy::NetworkFirst
    }
}

/// Cached entry to serve when a static asset is unreachable.
pub fn offline_fallback(path: &str) -> &'static str {
    if path.starts_with(ICONS_PREFIX) {
        FALLBACK_ICON
    } else {
        SHELL_PAGE
    }
}
