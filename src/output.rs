//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! Mock Shop
//!     Final URL: https://shop.example/
//!
//! Icon candidates
//! 001 class icon → https://shop.example/logo.png (selected)
//!     img class="site-icon"
//! 002 favicon → https://shop.example/favicon.ico
//!     origin
//! ```
//!
//! ## Generate
//!
//! ```text
//! Generated build/my-mail
//!     build/my-mail/index.html
//!     build/my-mail/manifest.json
//!     build/my-mail/service-worker.js
//!     build/my-mail/icons/icon-512x512.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::candidates::{CandidateSource, IconCandidate, IconTier};
use crate::metadata::PageMetadata;
use crate::types::GenerationResult;
use url::Url;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn tier_label(tier: IconTier) -> &'static str {
    match tier {
        IconTier::ClassIcon => "class icon",
        IconTier::AltHint => "alt hint",
        IconTier::FirstImage => "first image",
        IconTier::AppleTouch => "apple-touch-icon",
        IconTier::LinkIcon => "link icon",
        IconTier::Favicon => "favicon",
    }
}

/// Data URIs are shown by media type only.
fn display_url(url: &Url) -> String {
    if url.scheme() == "data" {
        let header = url.as_str().split(',').next().unwrap_or("data:");
        format!("{header},…")
    } else {
        url.to_string()
    }
}

/// Context line describing where a candidate came from.
fn candidate_origin(candidate: &IconCandidate) -> String {
    let hints = &candidate.hints;
    let mut parts = Vec::new();
    match candidate.source {
        CandidateSource::ImgTag => parts.push("img".to_string()),
        CandidateSource::LinkTag => parts.push("link".to_string()),
        CandidateSource::Origin => parts.push("origin".to_string()),
    }
    if let Some(rel) = &hints.rel {
        parts.push(format!("rel=\"{rel}\""));
    }
    if let Some(class) = &hints.class_name {
        parts.push(format!("class=\"{class}\""));
    }
    if let Some(alt) = &hints.alt {
        parts.push(format!("alt=\"{alt}\""));
    }
    parts.join(" ")
}

// ============================================================================
// Resolve
// ============================================================================

/// Format resolved page metadata: title first, then the ranked candidates.
pub fn format_metadata(metadata: &PageMetadata) -> Vec<String> {
    let mut lines = vec![metadata.title.clone()];
    match &metadata.final_url {
        Some(url) => lines.push(format!("{}Final URL: {url}", indent(1))),
        None => lines.push(format!("{}Page unreachable", indent(1))),
    }

    lines.push(String::new());
    if metadata.icon_candidates.is_empty() {
        lines.push("No icon candidates".to_string());
        return lines;
    }

    lines.push("Icon candidates".to_string());
    for (i, candidate) in metadata.icon_candidates.iter().enumerate() {
        let selected = if i == 0 { " (selected)" } else { "" };
        lines.push(format!(
            "{} {} → {}{selected}",
            format_index(i + 1),
            tier_label(candidate.tier),
            display_url(&candidate.url)
        ));
        lines.push(format!("{}{}", indent(1), candidate_origin(candidate)));
    }
    lines
}

pub fn print_metadata(metadata: &PageMetadata) {
    for line in format_metadata(metadata) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format a generation outcome.
pub fn format_result(result: &GenerationResult) -> Vec<String> {
    match result {
        GenerationResult::Success {
            project_dir, files, ..
        } => {
            let mut lines = vec![format!("Generated {project_dir}")];
            lines.extend(files.iter().map(|f| format!("{}{f}", indent(1))));
            lines
        }
        GenerationResult::Failure { error, .. } => vec![format!("Error: {error}")],
    }
}

pub fn print_result(result: &GenerationResult) {
    for line in format_result(result) {
        println!("{}", line);
    }
}
