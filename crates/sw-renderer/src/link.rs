//! URL handling for links and images.
//!
//! Two concerns live here: neutralizing URLs whose scheme could execute
//! code in the page, and rewriting relative `.md` links so they open in the
//! viewer instead of fetching raw markdown.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Replacement for URLs that fail the scheme check.
pub const BLOCKED_URL: &str = "#";

/// Schemes allowed in rendered links and images.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Characters left as-is when a document path goes into a query value.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Extract the scheme of a URL, if it has one.
///
/// ASCII whitespace and control characters are ignored, the way browsers
/// ignore them when parsing a scheme (`java\tscript:` is `javascript:`).
fn scheme_of(url: &str) -> Option<String> {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();
    let colon = cleaned.find(':')?;
    let candidate = &cleaned[..colon];
    if candidate.contains(['/', '?', '#']) {
        return None;
    }
    let mut chars = candidate.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then(|| candidate.to_ascii_lowercase())
}

/// Whether a link or image URL is safe to emit.
///
/// Relative URLs, fragments and the allowed schemes pass; everything else
/// (`javascript:`, `data:`, `vbscript:`, ...) does not.
#[must_use]
pub fn is_safe_url(url: &str) -> bool {
    scheme_of(url).is_none_or(|scheme| ALLOWED_SCHEMES.contains(&scheme.as_str()))
}

/// Directory part of a document path (`"ops/alerts.md"` gives `"ops"`).
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve a relative path against a base directory.
///
/// Handles `.` and `..`; `..` at the root is dropped so the result never
/// climbs above the document base.
#[must_use]
pub fn resolve_relative_path(relative: &str, base_dir: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}

fn is_external(url: &str) -> bool {
    url.starts_with("//") || url.starts_with('#') || scheme_of(url).is_some()
}

/// Rewrite a relative markdown link into a viewer link.
///
/// `guide/setup.md#install` relative to `base_dir` becomes
/// `{link_prefix}{encoded path}#install`. Links with a scheme, fragments,
/// and links to non-markdown files are returned unchanged.
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)]
pub fn resolve_doc_link(url: &str, base_dir: &str, link_prefix: &str) -> Option<String> {
    if is_external(url) {
        return None;
    }

    let (path_part, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };
    if !path_part.ends_with(".md") {
        return None;
    }

    let resolved = match path_part.strip_prefix('/') {
        Some(absolute) => resolve_relative_path(absolute, ""),
        None => resolve_relative_path(path_part, base_dir),
    };
    let encoded = utf8_percent_encode(&resolved, QUERY_VALUE);
    Some(format!("{link_prefix}{encoded}{fragment}"))
}

/// Resolve a relative asset URL (images, downloads) against the raw document mount.
#[must_use]
pub fn resolve_asset(url: &str, base_dir: &str, asset_prefix: &str) -> Option<String> {
    if is_external(url) || url.starts_with('/') {
        return None;
    }
    let resolved = resolve_relative_path(url, base_dir);
    Some(format!("{}/{resolved}", asset_prefix.trim_end_matches('/')))
}
