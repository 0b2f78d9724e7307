//! Documentation viewer for the StackWatch portal.
//!
//! A [`Viewer`] loads the documentation manifest once, selects the first
//! document (or a requested one), and keeps navigation state: the selected
//! document, expanded sections and the current phase. Failures never escape
//! as errors; they become state:
//!
//! - manifest unavailable: fallback content, empty menu, no banner
//! - manifest without files: [`Phase::ManifestError`] with a banner
//! - document unavailable: an error document naming the path, with a banner
//!
//! Document requests are last-request-wins: each request takes a sequence
//! number and only the newest one may commit.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sw_source::FsSource;
//! use sw_viewer::{Viewer, ViewerOptions};
//!
//! let viewer = Viewer::new(Arc::new(FsSource::new("docs")), ViewerOptions::default());
//! viewer.mount().await;
//! let view = viewer.view();
//! println!("{}", view.document.html);
//! ```

mod nav;
mod state;
mod viewer;

pub use nav::{NavEvent, NavItem, NavKind, NavOptions, build_navigation};
pub use state::{
    DEFAULT_CONTENT, NO_DOCUMENTS_CONTENT, Phase, ViewerError, ViewerState, error_document,
};
pub use viewer::{DocumentOutcome, DocumentRequest, Viewer, ViewerOptions, ViewerView};
