//! HTTP request handlers.

pub(crate) mod health;
pub(crate) mod help;
pub(crate) mod home;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod theme;

use std::collections::BTreeSet;

use axum::http::{HeaderMap, header};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use sw_config::Theme;
use sw_manifest::NodeKey;

/// Prefix rendered documents use for links to other documents.
pub(crate) const HELP_LINK_PREFIX: &str = "/help?doc=";

/// Cookie holding the visitor's theme.
pub(crate) const THEME_COOKIE: &str = "sw-theme";

/// Characters escaped inside query values built by the server.
pub(crate) const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Deep-link parameters shared by the viewer routes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewerQuery {
    /// Document to open instead of the first one.
    pub(crate) doc: Option<String>,
    /// Comma-separated section keys to expand (e.g. `0,0.1`).
    pub(crate) open: Option<String>,
}

impl ViewerQuery {
    /// Requested document, ignoring an empty value.
    pub(crate) fn doc(&self) -> Option<&str> {
        self.doc.as_deref().filter(|d| !d.is_empty())
    }

    /// Explicit expansion, or `None` when the query has no `open` parameter.
    ///
    /// Malformed keys are skipped.
    pub(crate) fn expanded(&self) -> Option<BTreeSet<NodeKey>> {
        let open = self.open.as_deref()?;
        Some(
            open.split(',')
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse::<NodeKey>() {
                    Ok(key) => Some(key),
                    Err(e) => {
                        tracing::debug!(key = %s, error = %e, "Ignoring section key");
                        None
                    }
                })
                .collect(),
        )
    }
}

/// Build a help viewer URL for a document and expansion set.
pub(crate) fn help_url(doc: Option<&str>, expanded: &BTreeSet<NodeKey>) -> String {
    let mut url = String::from("/help");
    let mut sep = '?';
    if let Some(doc) = doc {
        url.push(sep);
        url.push_str("doc=");
        url.extend(utf8_percent_encode(doc, QUERY_VALUE));
        sep = '&';
    }
    url.push(sep);
    url.push_str("open=");
    let keys: Vec<String> = expanded.iter().map(ToString::to_string).collect();
    url.push_str(&keys.join(","));
    url
}

/// Theme from the request cookie, or the configured default.
pub(crate) fn theme_from_headers(headers: &HeaderMap, default: Theme) -> Theme {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == THEME_COOKIE)
        .and_then(|(_, value)| Theme::parse(value))
        .unwrap_or(default)
}
