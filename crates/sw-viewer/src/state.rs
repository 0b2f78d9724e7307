//! Viewer state, phases and errors.

use std::collections::BTreeSet;

use serde::Serialize;
use sw_manifest::{Manifest, NodeKey};

/// Content shown when the manifest cannot be fetched or parsed.
pub const DEFAULT_CONTENT: &str = "# StackWatch Documentation

Welcome to the StackWatch Observability Platform documentation.

## Getting Started

StackWatch provides comprehensive infrastructure monitoring through:

- **Prometheus** - Time-series metrics collection and alerting
- **Grafana** - Data visualization and dashboards
- **Node Exporter** - Linux server metrics
- **Windows Exporter** - Windows server metrics

## Quick Links

### Accessing Services

| Service | URL | Description |
|---------|-----|-------------|
| Prometheus | `/prometheus/` | Query metrics and manage alerts |
| Grafana | `/grafana/` | View dashboards (default: admin/admin) |
| Dashboard | `/` | Main StackWatch interface |

### Common Tasks

1. **View server metrics** - Navigate to Prometheus and use PromQL queries
2. **Create dashboards** - Use Grafana to visualize your data
3. **Set up alerts** - Configure alerting rules in Prometheus

## Support

For additional support, please contact your system administrator.
";

/// Content shown when the manifest lists no documentation files.
pub const NO_DOCUMENTS_CONTENT: &str = "# No Documentation

No documentation files found in manifest.
";

/// Markdown shown in place of a document that failed to load.
#[must_use]
pub fn error_document(path: &str) -> String {
    format!("# Error\n\nUnable to load the requested document: `{path}`")
}

/// Which branch of the viewer is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Manifest request outstanding.
    #[default]
    LoadingManifest,
    /// Document request outstanding; previous content stays visible.
    LoadingDocument,
    /// Content is current.
    Ready,
    /// Manifest loaded but lists no files.
    ManifestError,
    /// Last document request failed; the error document is shown.
    DocumentError,
}

impl Phase {
    /// Whether the viewer has settled (`ManifestError` and `DocumentError`
    /// are sub-states of ready that carry a banner).
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready | Self::ManifestError | Self::DocumentError)
    }
}

/// Errors surfaced by the viewer.
///
/// None of these escape as `Err`: loaders convert them into state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    /// Manifest fetch or parse failed. Logged only; the fallback document
    /// is shown without a banner.
    #[error("Failed to load documentation manifest: {message}")]
    ManifestUnavailable {
        /// Underlying failure.
        message: String,
    },
    /// Manifest has no navigable files.
    #[error("No documentation files found in manifest")]
    ManifestEmpty,
    /// A single document failed to load.
    #[error("Failed to load document: {path}")]
    DocumentUnavailable {
        /// Requested document path.
        path: String,
        /// Underlying failure.
        message: String,
    },
}

/// Mutable state owned by one viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewerState {
    /// Loaded manifest; `None` before loading and after a manifest failure.
    pub menu: Option<Manifest>,
    /// Path of the displayed (or last attempted) document.
    pub selected_path: Option<String>,
    /// Raw markdown currently shown.
    pub content: String,
    /// Expanded sections, by structural key.
    pub expanded: BTreeSet<NodeKey>,
    pub phase: Phase,
    /// Visible banner.
    pub error: Option<ViewerError>,
    /// Path of the newest in-flight document request.
    pub pending_path: Option<String>,
}

impl ViewerState {
    /// Top-level menu nodes, empty when no manifest is loaded.
    #[must_use]
    pub fn sections(&self) -> &[sw_manifest::MenuNode] {
        self.menu.as_ref().map_or(&[], |m| m.sections.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_error_document_names_path() {
        assert_eq!(
            error_document("missing.md"),
            "# Error\n\nUnable to load the requested document: `missing.md`"
        );
    }

    #[test]
    fn test_phase_ready_substates() {
        assert!(Phase::Ready.is_ready());
        assert!(Phase::ManifestError.is_ready());
        assert!(Phase::DocumentError.is_ready());
        assert!(!Phase::LoadingManifest.is_ready());
        assert!(!Phase::LoadingDocument.is_ready());
    }

    #[test]
    fn test_initial_state() {
        let state = ViewerState::default();

        assert_eq!(state.phase, Phase::LoadingManifest);
        assert!(state.sections().is_empty());
        assert!(state.content.is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err = ViewerError::DocumentUnavailable {
            path: "a.md".to_owned(),
            message: "Not found".to_owned(),
        };

        assert_eq!(err.to_string(), "Failed to load document: a.md");
        assert_eq!(
            ViewerError::ManifestEmpty.to_string(),
            "No documentation files found in manifest"
        );
    }

    #[test]
    fn test_phase_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Phase::DocumentError).unwrap(),
            r#""document_error""#
        );
    }
}
