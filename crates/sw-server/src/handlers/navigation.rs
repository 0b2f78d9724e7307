//! Navigation API endpoint.
//!
//! Returns the sidebar tree for a viewer mounted from the query string.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use sw_viewer::{NavItem, Phase};

use crate::handlers::ViewerQuery;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavItem>,
    /// Path of the document the viewer settled on.
    selected: Option<String>,
    phase: Phase,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewerQuery>,
) -> Json<NavigationResponse> {
    let viewer = state.viewer(query.expanded());
    viewer.mount_at(query.doc()).await;
    let snapshot = viewer.snapshot();

    Json(NavigationResponse {
        items: viewer.navigation(),
        selected: snapshot.selected_path,
        phase: snapshot.phase,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use sw_manifest::MenuNode;
    use sw_viewer::{NavOptions, build_navigation};

    use super::*;

    #[test]
    fn test_navigation_response_serialization() {
        let items = build_navigation(
            &[MenuNode::file("Guide", "guide.md")],
            Some("guide.md"),
            &BTreeSet::new(),
            NavOptions::default(),
        );
        let response = NavigationResponse {
            items,
            selected: Some("guide.md".to_owned()),
            phase: Phase::Ready,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["items"][0]["title"], "Guide");
        assert_eq!(json["items"][0]["path"], "guide.md");
        assert_eq!(json["items"][0]["selected"], true);
        assert_eq!(json["selected"], "guide.md");
        assert_eq!(json["phase"], "ready");
    }
}
