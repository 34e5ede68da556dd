//! Icon candidate extraction and ranking.
//!
//! Arbitrary pages rarely declare a usable app icon, so the resolver collects
//! every image-ish reference it can find and ranks them. Ranking is a total
//! order: by tier first, then by document order.
//!
//! | Tier | Matches |
//! |---|---|
//! | [`ClassIcon`](IconTier::ClassIcon) | `<img>` whose `class` contains `icon` (data-URI `src` excluded) |
//! | [`AltHint`](IconTier::AltHint) | `<img>` whose `alt` contains `logo` or `icon` |
//! | [`FirstImage`](IconTier::FirstImage) | the first `<img>` not matched above |
//! | [`AppleTouch`](IconTier::AppleTouch) | `<link>` whose `rel` contains `apple-touch-icon` |
//! | [`LinkIcon`](IconTier::LinkIcon) | any other `<link>` whose `rel` contains `icon` |
//! | [`Favicon`](IconTier::Favicon) | `/favicon.ico` on the page origin |
//!
//! Each element lands in the first tier whose rule it satisfies; the rules
//! are plain functions in an ordered table, so each can be tested on its own.
//! Keyword matching is ASCII case-insensitive.
//!
//! References are resolved against the page's final (post-redirect) URL.
//! Elements with a missing or blank reference, or one that does not resolve
//! to an `http`, `https` or `data` URL, are skipped. The same URL found in
//! two tiers is kept once, at its better rank.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("static selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel]").expect("static selector"));

/// Where a candidate reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    ImgTag,
    LinkTag,
    /// Not in the markup: the conventional `/favicon.ico` of the origin.
    Origin,
}

/// Ranking tier, best first. `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTier {
    ClassIcon,
    AltHint,
    FirstImage,
    AppleTouch,
    LinkIcon,
    Favicon,
}

/// The attributes that drove the ranking decision, kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
}

/// One ranked icon reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconCandidate {
    pub url: Url,
    pub source: CandidateSource,
    pub tier: IconTier,
    pub hints: Hints,
}

/// An element reference before tier assignment.
struct Reference<'a> {
    value: &'a str,
    hints: Hints,
}

type Rule = fn(&Reference<'_>) -> bool;

/// `<img>` rules in priority order. Images matching none fall to
/// [`IconTier::FirstImage`].
const IMG_RULES: &[(IconTier, Rule)] = &[
    (IconTier::ClassIcon, class_mentions_icon),
    (IconTier::AltHint, alt_mentions_logo_or_icon),
];

/// `<link>` rules in priority order. Links matching none are not icons.
const LINK_RULES: &[(IconTier, Rule)] = &[
    (IconTier::AppleTouch, rel_is_apple_touch_icon),
    (IconTier::LinkIcon, rel_mentions_icon),
];

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_ascii_lowercase().contains(needle))
}

fn is_data_uri(value: &str) -> bool {
    value.trim_start().get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:"))
}

fn class_mentions_icon(r: &Reference<'_>) -> bool {
    contains_ignore_case(r.hints.class_name.as_deref(), "icon") && !is_data_uri(r.value)
}

fn alt_mentions_logo_or_icon(r: &Reference<'_>) -> bool {
    let alt = r.hints.alt.as_deref();
    contains_ignore_case(alt, "logo") || contains_ignore_case(alt, "icon")
}

fn rel_is_apple_touch_icon(r: &Reference<'_>) -> bool {
    contains_ignore_case(r.hints.rel.as_deref(), "apple-touch-icon")
}

fn rel_mentions_icon(r: &Reference<'_>) -> bool {
    contains_ignore_case(r.hints.rel.as_deref(), "icon")
}

fn first_matching_tier(rules: &[(IconTier, Rule)], reference: &Reference<'_>) -> Option<IconTier> {
    rules
        .iter()
        .find(|(_, rule)| rule(reference))
        .map(|(tier, _)| *tier)
}

/// Resolve a raw reference against the page URL, keeping only fetchable schemes.
fn absolutize(base: &Url, value: &str) -> Option<Url> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let url = base.join(value).ok()?;
    matches!(url.scheme(), "http" | "https" | "data").then_some(url)
}

fn attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

/// Extract and rank every icon candidate in a parsed document.
///
/// The result is sorted best first; its head is the selected icon. It is
/// never empty for a base URL with a host, because the origin favicon is
/// always appended.
pub fn rank_candidates(document: &Html, base: &Url) -> Vec<IconCandidate> {
    let mut ranked = Vec::new();
    let mut took_first_image = false;

    for element in document.select(&IMG) {
        let Some(value) = element.value().attr("src") else {
            continue;
        };
        let reference = Reference {
            value,
            hints: Hints {
                class_name: attr(&element, "class"),
                alt: attr(&element, "alt"),
                rel: None,
            },
        };
        let Some(url) = absolutize(base, reference.value) else {
            continue;
        };
        let tier = match first_matching_tier(IMG_RULES, &reference) {
            Some(tier) => tier,
            None if !took_first_image => {
                took_first_image = true;
                IconTier::FirstImage
            }
            None => continue,
        };
        ranked.push(IconCandidate {
            url,
            source: CandidateSource::ImgTag,
            tier,
            hints: reference.hints,
        });
    }

    for element in document.select(&LINK) {
        let Some(value) = element.value().attr("href") else {
            continue;
        };
        let reference = Reference {
            value,
            hints: Hints {
                rel: attr(&element, "rel"),
                ..Hints::default()
            },
        };
        let Some(tier) = first_matching_tier(LINK_RULES, &reference) else {
            continue;
        };
        let Some(url) = absolutize(base, reference.value) else {
            continue;
        };
        ranked.push(IconCandidate {
            url,
            source: CandidateSource::LinkTag,
            tier,
            hints: reference.hints,
        });
    }

    if base.has_host() {
        if let Ok(url) = base.join("/favicon.ico") {
            ranked.push(IconCandidate {
                url,
                source: CandidateSource::Origin,
                tier: IconTier::Favicon,
                hints: Hints::default(),
            });
        }
    }

    // Stable: document order survives within a tier.
    ranked.sort_by_key(|c| c.tier);

    let mut seen = HashSet::new();
    ranked.retain(|c| seen.insert(c.url.clone()));
    ranked
}
