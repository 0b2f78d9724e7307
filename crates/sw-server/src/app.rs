//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(handlers::health::get_health))
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/pages/{*path}", get(handlers::pages::get_page));

    let mut router = Router::new()
        .route("/", get(handlers::home::get_home))
        .route("/help", get(handlers::help::get_help))
        .route("/theme/{theme}", get(handlers::theme::set_theme))
        .merge(api_routes);

    // Raw manifest and markdown, as the gateway would serve them
    if let Some(dir) = &state.raw_docs_dir {
        tracing::debug!(mount = %state.mount_path, dir = %dir.display(), "Serving raw documents");
        router = router.nest_service(&state.mount_path, ServeDir::new(dir));
    }

    router
        .layer(security::layers())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use sw_config::Theme;
    use sw_source::{DocSource, MockSource};
    use tower::ServiceExt;

    use super::*;
    use crate::{DocsLocation, ServerConfig};

    const MANIFEST: &str = r#"{
        "sections": [
            {"title": "Alerting", "type": "section", "children": [
                {"title": "Rules", "type": "file", "path": "alerting/rules.md"}
            ]},
            {"title": "FAQ", "type": "file", "path": "faq.md"}
        ]
    }"#;

    fn mock_source() -> MockSource {
        MockSource::new()
            .with_manifest(MANIFEST)
            .with_document("alerting/rules.md", "# Rules\n\n## Setup\n\nSee [FAQ](../faq.md).")
            .with_document("faq.md", "# FAQ\n\n<script>alert(1)</script>")
    }

    fn config() -> ServerConfig {
        ServerConfig {
            docs: DocsLocation::Remote("http://gateway/help/docs".to_owned()),
            version: "1.0.0".to_owned(),
            ..ServerConfig::default()
        }
    }

    fn router_with(source: MockSource, config: &ServerConfig) -> Router {
        let source: Arc<dyn DocSource> = Arc::new(source);
        create_router(Arc::new(AppState::new(source, config)))
    }

    fn router() -> Router {
        router_with(mock_source(), &config())
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_home_lists_services() {
        let (status, _, body) = get(router(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Prometheus"));
        assert!(body.contains("Grafana"));
        assert!(body.contains("StackWatch v1.0.0"));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let (_, headers, _) = get(router(), "/").await;

        assert!(headers.contains_key("content-security-policy"));
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_help_shows_first_document() {
        let (status, _, body) = get(router(), "/help").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Rules - StackWatch</title>"));
        // Ancestor section is revealed, so the file link is shown.
        assert!(body.contains("class=\"nav-file selected\""));
        assert!(body.contains("href=\"/help?doc=faq.md&amp;open=0\""));
    }

    #[tokio::test]
    async fn test_help_deep_link_escapes_raw_html() {
        let (_, _, body) = get(router(), "/help?doc=faq.md&open=").await;

        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!body.contains("<script>alert"));
        // Section stays collapsed.
        assert!(!body.contains("alerting/rules.md"));
    }

    #[tokio::test]
    async fn test_help_rewrites_relative_links() {
        let (_, _, body) = get(router(), "/help?doc=alerting/rules.md").await;

        assert!(body.contains("href=\"/help?doc=faq.md\""));
    }

    #[tokio::test]
    async fn test_help_missing_document_banner() {
        let (status, _, body) = get(router(), "/help?doc=missing.md").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Failed to load document: missing.md"));
        assert!(body.contains("Unable to load the requested document"));
    }

    #[tokio::test]
    async fn test_help_manifest_unavailable_shows_fallback() {
        let router = router_with(MockSource::new(), &config());

        let (status, _, body) = get(router, "/help").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("StackWatch Documentation"));
        assert!(!body.contains("role=\"alert\""));
    }

    #[tokio::test]
    async fn test_help_empty_manifest_banner() {
        let router = router_with(
            MockSource::new().with_manifest(r#"{"sections": []}"#),
            &config(),
        );

        let (_, _, body) = get(router, "/help").await;

        assert!(body.contains("role=\"alert\">No documentation files found in manifest</div>"));
    }

    #[tokio::test]
    async fn test_navigation_api() {
        let (status, _, body) = get(router(), "/api/navigation?doc=faq.md&open=0").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["selected"], "faq.md");
        assert_eq!(json["items"][0]["expanded"], true);
        assert_eq!(json["items"][0]["children"][0]["path"], "alerting/rules.md");
        assert_eq!(json["items"][1]["selected"], true);
    }

    #[tokio::test]
    async fn test_pages_api() {
        let (status, headers, body) = get(router(), "/api/pages/alerting/rules.md").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["path"], "alerting/rules.md");
        assert_eq!(json["title"], "Rules");
        assert_eq!(json["toc"][0]["title"], "Setup");
        assert!(headers.contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn test_pages_api_not_modified() {
        let (_, headers, _) = get(router(), "/api/pages/faq.md").await;
        let etag = headers[header::ETAG].clone();

        let response = router()
            .oneshot(
                Request::get("/api/pages/faq.md")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_pages_api_not_found() {
        let (status, _, body) = get(router(), "/api/pages/missing.md").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["path"], "missing.md");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get(router(), "/api/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_theme_sets_cookie_and_redirects() {
        let (status, headers, _) = get(router(), "/theme/dark?return=/help%3Fdoc%3Dfaq.md").await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/help?doc=faq.md");
        assert!(
            headers[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .starts_with("sw-theme=dark;")
        );
    }

    #[tokio::test]
    async fn test_theme_redirect_stays_on_site() {
        for uri in [
            "/theme/dark?return=/%09/evil.example",
            "/theme/dark?return=/%0A/evil.example",
            "/theme/dark?return=//evil.example",
        ] {
            let (status, headers, _) = get(router(), uri).await;

            assert_eq!(status, StatusCode::SEE_OTHER);
            assert_eq!(headers[header::LOCATION], "/", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_theme_cookie_applied() {
        let response = router()
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, "sw-theme=dark")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        assert!(String::from_utf8_lossy(&body).contains("data-theme=\"dark\""));
    }

    #[tokio::test]
    async fn test_unknown_theme() {
        let (status, _, _) = get(router(), "/theme/sepia").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_default_theme_from_config() {
        let config = ServerConfig {
            theme: Theme::Dark,
            ..config()
        };

        let (_, _, body) = get(router_with(mock_source(), &config), "/").await;

        assert!(body.contains("data-theme=\"dark\""));
    }

    #[tokio::test]
    async fn test_raw_documents_served_from_local_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("manifest.json"), MANIFEST).unwrap();
        let config = ServerConfig {
            docs: DocsLocation::Local(dir.path().to_path_buf()),
            ..config()
        };
        let router = create_router(Arc::new(AppState::new(config.source(), &config)));

        let (status, _, body) = get(router, "/help/docs/manifest.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Alerting"));
    }
}
