//! Help viewer page.
//!
//! Mounts a fresh viewer per request from the `doc` and `open` query
//! parameters and renders it to HTML.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::Html;

use crate::handlers::{ViewerQuery, theme_from_headers};
use crate::page::{self, Chrome};
use crate::state::AppState;

/// Handle GET /help.
pub(crate) async fn get_help(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewerQuery>,
    uri: Uri,
    headers: HeaderMap,
) -> Html<String> {
    let viewer = state.viewer(query.expanded());
    viewer.mount_at(query.doc()).await;
    let view = viewer.view();

    let current = uri.path_and_query().map_or("/help", |pq| pq.as_str());
    let chrome = Chrome {
        title: &state.title,
        version: &state.version,
        theme: theme_from_headers(&headers, state.default_theme),
        current,
    };
    let page_title = view.document.title.clone().unwrap_or_else(|| "Help".to_owned());
    let body = page::render_help(&view);
    Html(page::render_layout(&chrome, &page_title, &body))
}
