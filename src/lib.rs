//! # PWA Shell
//!
//! Wraps an arbitrary website in an installable, offline-capable web app.
//! Given a URL, a display name and an optional icon, it writes a static
//! project directory: a shell page that frames the site in a full-viewport
//! iframe, a web app manifest, a service worker, and a 512×512 icon.
//!
//! # Architecture: Resolve → Normalize → Generate
//!
//! ```text
//! 1. Resolve    URL          →  PageMetadata   (title + ranked icon candidates)
//! 2. Normalize  icon source  →  ResolvedIcon   (512×512 PNG or placeholder)
//! 3. Generate   ProjectSpec  →  build/<slug>/  (shell, manifest, worker, icon)
//! ```
//!
//! Resolution and normalization never fail: an unreachable page still yields
//! a host-name title, and an unusable icon degrades to a placeholder. Only
//! request validation and the final write can turn a request into a
//! [`types::GenerationResult::Failure`].
//!
//! The generated worker's behavior is modelled natively by [`runtime`], an
//! install → activate → fetch state machine over pluggable cache storage and
//! network traits. It is what the unit tests exercise in place of a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | Title fallback chain and page metadata resolution |
//! | [`candidates`] | Icon candidate extraction and six-tier ranking |
//! | [`fetch`] | Shared HTTP client with bounded timeouts |
//! | [`normalize`] | Icon loading (URL, data URI, path) and 512×512 cover fit |
//! | [`imaging`] | Pure-Rust decode/resize/encode behind the [`imaging::IconBackend`] trait |
//! | [`generate`] | Shell page (Maud), manifest and worker script rendering |
//! | [`runtime`] | Offline cache state machine mirroring the generated worker |
//! | [`project`] | Request validation, the end-to-end [`project::Pipeline`], disk output |
//! | [`config`] | `pwa-shell.toml` loading and validation |
//! | [`naming`] | Display-name → directory slug and manifest short name |
//! | [`types`] | Request and result types shared by the CLI and pipeline |
//! | [`output`] | CLI text formatting |
//!
//! # Design Decisions
//!
//! ## Maud For The Shell Page
//!
//! The shell page is rendered with [Maud](https://maud.lambda.xyz/), so the
//! wrapped URL and the display name are escaped by construction. The worker
//! script is a static template whose tokens are replaced with JSON string
//! literals, never raw text.
//!
//! ## Pure-Rust Imaging
//!
//! Icons are decoded, resized (Lanczos3) and re-encoded as PNG with the
//! `image` crate alone. There are no system dependencies to install.
//!
//! ## Versioned Cache
//!
//! The worker's cache is named `pwa-cache-<version>`. Activating a new
//! version deletes every other cache, so a redeploy never serves stale
//! shell assets.

pub mod candidates;
pub mod config;
pub mod fetch;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod normalize;
pub mod output;
pub mod project;
pub mod runtime;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
