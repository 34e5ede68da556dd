//! Page metadata resolution: title and icon candidates.
//!
//! Given the URL of a page we do not control, infer a display title and a
//! ranked list of icon references. Resolution is total: a page that cannot
//! be fetched or parsed still yields a title (from the host name) and an
//! empty candidate list, never an error.
//!
//! ## Title resolution
//!
//! Each extractor is tried in order; the first non-empty (trimmed) value wins:
//!
//! 1. `<title>` text
//! 2. `<meta name="title" content="…">`
//! 3. `<meta property="og:title" content="…">`
//! 4. the host name, minus a leading `www.`
//!
//! When the URL has no host at all, the title is [`DEFAULT_TITLE`].
//!
//! ## Icon candidates
//!
//! Delegated to [`candidates::rank_candidates`](crate::candidates::rank_candidates),
//! which sees the final URL after redirects.

use crate::candidates::{IconCandidate, rank_candidates};
use crate::fetch::Fetcher;
use scraper::{Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

/// Title used when neither the page nor the URL offers anything better.
pub const DEFAULT_TITLE: &str = "PWA App";

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));
static META_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="title"]"#).expect("static selector"));
static META_OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("static selector"));

/// What the resolver learned about a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    /// URL the page was served from after redirects; `None` when the fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<Url>,
    /// Ranked best first.
    pub icon_candidates: Vec<IconCandidate>,
}

impl PageMetadata {
    /// Degraded result for an unreachable or unparsable page.
    pub fn unreachable(url: Option<&Url>) -> Self {
        Self {
            title: url.map(host_title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            final_url: None,
            icon_candidates: Vec::new(),
        }
    }

    /// The single selected icon: the best-ranked candidate.
    pub fn selected_icon(&self) -> Option<&IconCandidate> {
        self.icon_candidates.first()
    }
}

/// Return the first source that is present and non-blank, trimmed.
///
/// ```
/// # use pwa_shell::metadata::resolve;
/// assert_eq!(resolve(&[None, Some("  "), Some(" Mail ")]), Some("Mail".to_string()));
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

type TitleExtractor = fn(&Html) -> Option<String>;

/// Title extractors in priority order.
const TITLE_CHAIN: &[TitleExtractor] = &[document_title, meta_name_title, meta_og_title];

fn document_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>())
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .find(|content| !content.trim().is_empty())
        .map(String::from)
}

fn meta_name_title(document: &Html) -> Option<String> {
    meta_content(document, &META_TITLE)
}

fn meta_og_title(document: &Html) -> Option<String> {
    meta_content(document, &META_OG_TITLE)
}

/// Host name with a leading `www.` removed, or [`DEFAULT_TITLE`].
pub fn host_title(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    resolve(&[Some(host)]).unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Resolve the display title of a parsed document served from `page_url`.
pub fn extract_title(document: &Html, page_url: &Url) -> String {
    let extracted: Vec<Option<String>> = TITLE_CHAIN.iter().map(|f| f(document)).collect();
    let sources: Vec<Option<&str>> = extracted.iter().map(Option::as_deref).collect();
    resolve(&sources).unwrap_or_else(|| host_title(page_url))
}

/// Parse markup and extract its metadata. Pure: no I/O.
pub fn extract_metadata(html: &str, page_url: &Url) -> PageMetadata {
    let document = Html::parse_document(html);
    PageMetadata {
        title: extract_title(&document, page_url),
        final_url: Some(page_url.clone()),
        icon_candidates: rank_candidates(&document, page_url),
    }
}

/// Fetches pages and extracts their metadata.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    fetcher: Fetcher,
}

impl MetadataResolver {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Resolve a page's title and icon candidates. Never fails.
    pub async fn resolve(&self, url: &str) -> PageMetadata {
        let url = match Url::parse(url.trim()) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Cannot parse page URL {url:?}: {e}");
                return PageMetadata::unreachable(None);
            }
        };
        match self.fetcher.page(&url).await {
            Ok(page) => {
                let metadata = extract_metadata(&page.body, &page.final_url);
                log::debug!(
                    "Resolved {url}: title {:?}, {} icon candidate(s)",
                    metadata.title,
                    metadata.icon_candidates.len()
                );
                metadata
            }
            Err(e) => {
                log::warn!("Cannot fetch {url}, falling back to host name: {e}");
                PageMetadata::unreachable(Some(&url))
            }
        }
    }
}
