//! Pages API endpoint.
//!
//! Loads one document through a fresh viewer and returns JSON with the
//! rendered HTML, title and table of contents.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use md5::{Digest, Md5};
use serde::Serialize;
use sw_renderer::TocEntry;
use sw_viewer::{DocumentOutcome, Phase, ViewerError};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Document path as requested.
    path: String,
    /// Title from the first H1.
    title: Option<String>,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Rendered HTML content.
    content: String,
    phase: Phase,
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let viewer = state.viewer(None);
    if viewer.load_document(&path).await != DocumentOutcome::Committed {
        let message = match viewer.snapshot().error {
            Some(ViewerError::DocumentUnavailable { message, .. }) => message,
            other => other.map(|e| e.to_string()).unwrap_or_default(),
        };
        return Err(ServerError::PageNotFound { path, message });
    }
    let view = viewer.view();

    // Compute ETag
    let etag = compute_etag(&state.version, &view.document.html);

    // Check If-None-Match header for conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let response = PageResponse {
        path,
        title: view.document.title,
        toc: view.document.toc,
        content: view.document.html,
        phase: view.phase,
    };

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compute_etag_includes_version_and_content() {
        assert_ne!(compute_etag("1.0.0", "a"), compute_etag("1.0.1", "a"));
        assert_ne!(compute_etag("1.0.0", "a"), compute_etag("1.0.0", "b"));
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_page_response_serialization() {
        let response = PageResponse {
            path: "alerting/rules.md".to_owned(),
            title: Some("Rules".to_owned()),
            toc: vec![TocEntry {
                level: 2,
                title: "Setup".to_owned(),
                id: "setup".to_owned(),
            }],
            content: "<p>x</p>".to_owned(),
            phase: Phase::Ready,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["path"], "alerting/rules.md");
        assert_eq!(json["title"], "Rules");
        assert_eq!(json["toc"][0]["id"], "setup");
        assert_eq!(json["phase"], "ready");
    }
}
