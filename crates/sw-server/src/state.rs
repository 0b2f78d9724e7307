//! Application state.
//!
//! Shared state for all request handlers.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use sw_config::{ServiceConfig, Theme};
use sw_manifest::NodeKey;
use sw_source::DocSource;
use sw_viewer::{NavOptions, Viewer, ViewerOptions};

use crate::{DocsLocation, ServerConfig};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Where the manifest and documents come from.
    pub(crate) source: Arc<dyn DocSource>,
    /// Options every per-request viewer is created with.
    pub(crate) viewer_options: ViewerOptions,
    /// URL path for raw documentation files.
    pub(crate) mount_path: String,
    /// Local directory served at `mount_path`, if any.
    pub(crate) raw_docs_dir: Option<PathBuf>,
    pub(crate) default_theme: Theme,
    pub(crate) title: String,
    pub(crate) services: Vec<ServiceConfig>,
    /// Application version for the footer and `ETag`s.
    pub(crate) version: String,
}

impl AppState {
    pub(crate) fn new(source: Arc<dyn DocSource>, config: &ServerConfig) -> Self {
        let asset_prefix = match &config.docs {
            DocsLocation::Local(_) => config.mount_path.clone(),
            DocsLocation::Remote(url) => url.trim_end_matches('/').to_owned(),
        };
        let raw_docs_dir = match &config.docs {
            DocsLocation::Local(dir) => Some(dir.clone()),
            DocsLocation::Remote(_) => None,
        };

        Self {
            source,
            viewer_options: ViewerOptions {
                nav: NavOptions {
                    expandable: config.expandable,
                },
                link_prefix: Some(crate::handlers::HELP_LINK_PREFIX.to_owned()),
                asset_prefix: Some(asset_prefix),
            },
            mount_path: config.mount_path.clone(),
            raw_docs_dir,
            default_theme: config.theme,
            title: config.title.clone(),
            services: config.services.clone(),
            version: config.version.clone(),
        }
    }

    /// Create a fresh, unmounted viewer.
    ///
    /// With `expanded`, the viewer starts with exactly those sections open.
    pub(crate) fn viewer(&self, expanded: Option<BTreeSet<NodeKey>>) -> Viewer {
        let viewer = Viewer::new(Arc::clone(&self.source), self.viewer_options.clone());
        match expanded {
            Some(keys) => viewer.with_expanded(keys),
            None => viewer,
        }
    }
}
