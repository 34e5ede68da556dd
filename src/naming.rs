//! Names derived from a project's display name.
//!
//! A display name like `"My Cool App"` produces two derived names:
//!
//! - **Slug** (`my-cool-app`): the output directory under the build root.
//!   Slugs are not unique. Two projects whose names slugify identically write
//!   into the same directory and the later one wins, which makes
//!   regeneration idempotent.
//! - **Short name** (`My Cool App`, or `Twelve chars...` when longer than
//!   twelve characters): the manifest's `short_name`, shown under the home
//!   screen icon where space is tight.

/// Maximum `short_name` length before truncation, in characters.
pub const SHORT_NAME_MAX: usize = 12;

/// Marker appended to a truncated `short_name`.
pub const ELLIPSIS: &str = "...";

/// Derive the output directory slug from a display name.
///
/// - Lowercases the name
/// - Collapses each run of whitespace into a single `-`
/// - Maps path separators (`/`, `\`) to `-` so the slug stays one path segment
///
/// Leading and trailing whitespace becomes a leading/trailing dash, exactly
/// like interior runs; callers trim the name first.
///
/// ```
/// # use pwa_shell::naming::slugify;
/// assert_eq!(slugify("My  Cool\tApp"), "my-cool-app");
/// ```
pub fn slugify(display_name: &str) -> String {
    let mut slug = String::with_capacity(display_name.len());
    let mut in_space = false;
    for c in display_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '/' | '\\' => slug.push('-'),
            _ => slug.extend(c.to_lowercase()),
        }
    }
    slug
}

/// Whether a slug is usable as a single directory name under the output root.
///
/// Rejects empty slugs and the `.`/`..` path components.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".."
}

/// Derive the manifest `short_name`.
///
/// Names up to [`SHORT_NAME_MAX`] characters are kept as-is; longer names
/// keep their first twelve characters followed by [`ELLIPSIS`].
pub fn short_name(display_name: &str) -> String {
    if display_name.chars().count() <= SHORT_NAME_MAX {
        return display_name.to_string();
    }
    let mut short: String = display_name.chars().take(SHORT_NAME_MAX).collect();
    short.push_str(ELLIPSIS);
    short
}
