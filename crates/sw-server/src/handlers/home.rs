//! Portal landing page.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

use crate::handlers::theme_from_headers;
use crate::page::{self, Chrome};
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let chrome = Chrome {
        title: &state.title,
        version: &state.version,
        theme: theme_from_headers(&headers, state.default_theme),
        current: "/",
    };
    let body = page::render_home(&state.services);
    Html(page::render_layout(&chrome, "Services", &body))
}
