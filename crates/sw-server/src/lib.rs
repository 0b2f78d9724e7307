//! HTTP server for the StackWatch portal.
//!
//! This crate serves, using axum:
//! - the portal landing page with service cards (`/`)
//! - the help viewer, rendered on the server (`/help`)
//! - JSON endpoints for navigation, pages and health (`/api/*`)
//! - raw documentation files when they live on the local filesystem
//!
//! # Quick Start
//!
//! ```ignore
//! use sw_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 7979,
//!         version: "0.1.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (sw-server)
//!                        │
//!                        ├─► HTML pages ──► Viewer (per request) ──► DocSource
//!                        │
//!                        ├─► API routes ──► Viewer (per request) ──► DocSource
//!                        │
//!                        └─► Raw docs (tower-http ServeDir, filesystem only)
//! ```
//!
//! Every request mounts a fresh [`sw_viewer::Viewer`], so visitors never
//! share navigation state. Deep links carry the document and the expanded
//! sections in the query string.

mod app;
mod error;
mod handlers;
mod middleware;
mod page;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sw_config::{ServiceConfig, Theme};
use sw_source::{DocSource, FsSource, HttpSource};

pub use error::ServerError;
use state::AppState;

/// Where documentation is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocsLocation {
    /// Local directory; also served raw at the mount path.
    Local(PathBuf),
    /// Documentation base URL (e.g. `http://gateway/help/docs`).
    Remote(String),
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    pub docs: DocsLocation,
    /// Manifest name relative to the documentation base.
    pub manifest: String,
    /// URL path for raw documentation files.
    pub mount_path: String,
    /// HTTP fetch timeout for remote documentation.
    pub timeout_secs: u64,
    /// Collapsible (`true`) or flat (`false`) sidebar.
    pub expandable: bool,
    /// Theme for visitors without a stored preference.
    pub theme: Theme,
    /// Platform name shown in the header.
    pub title: String,
    /// Service cards on the landing page.
    pub services: Vec<ServiceConfig>,
    /// Application version (footer, health endpoint, `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            docs: DocsLocation::Local(PathBuf::from("docs")),
            manifest: sw_source::DEFAULT_MANIFEST.to_owned(),
            mount_path: "/help/docs".to_owned(),
            timeout_secs: sw_source::DEFAULT_TIMEOUT,
            expandable: true,
            theme: Theme::Light,
            title: "StackWatch".to_owned(),
            services: sw_config::default_services(),
            version: String::new(),
        }
    }
}

impl ServerConfig {
    /// Open the documentation source this configuration points at.
    #[must_use]
    pub fn source(&self) -> Arc<dyn DocSource> {
        match &self.docs {
            DocsLocation::Local(dir) => {
                Arc::new(FsSource::new(dir.clone()).with_manifest(self.manifest.clone()))
            }
            DocsLocation::Remote(url) => Arc::new(
                HttpSource::with_timeout(url, Duration::from_secs(self.timeout_secs))
                    .with_manifest(self.manifest.clone()),
            ),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let source = config.source();
    tracing::info!(source = %source.describe(), "Serving documentation");

    let state = Arc::new(AppState::new(source, &config));
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))
        .map_err(|e| ServerError::InvalidAddress(e.to_string()))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded configuration.
#[must_use]
pub fn server_config_from_config(config: &sw_config::Config, version: String) -> ServerConfig {
    let docs = &config.docs_resolved;
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        docs: docs.base_url.as_ref().map_or_else(
            || DocsLocation::Local(docs.source_dir.clone()),
            |url| DocsLocation::Remote(url.clone()),
        ),
        manifest: docs.manifest.clone(),
        mount_path: docs.mount_path.clone(),
        timeout_secs: docs.timeout_secs,
        expandable: config.viewer.expandable,
        theme: config.ui.theme,
        title: config.ui.title.clone(),
        services: config.services(),
        version,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config_local() {
        let config = sw_config::Config::default();

        let server = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server.docs, DocsLocation::Local(PathBuf::from("./docs")));
        assert_eq!(server.port, 7979);
        assert_eq!(server.services.len(), 3);
        assert_eq!(server.version, "1.2.3");
    }

    #[test]
    fn test_server_config_from_config_remote() {
        let mut config = sw_config::Config::default();
        config.docs_resolved.base_url = Some("http://gateway/help/docs".to_owned());

        let server = server_config_from_config(&config, String::new());

        assert_eq!(
            server.docs,
            DocsLocation::Remote("http://gateway/help/docs".to_owned())
        );
        assert_eq!(server.source().describe(), "http://gateway/help/docs");
    }
}
