//! Document sources for the StackWatch help viewer.
//!
//! This crate provides a [`DocSource`] trait for fetching the documentation
//! manifest and individual markdown documents, independent of where they live:
//!
//! - [`FsSource`] reads from a local documentation directory
//! - [`HttpSource`] fetches from a documentation base URL
//! - [`MockSource`] keeps everything in memory (behind the `mock` feature flag)
//!
//! Sources return raw text only. Parsing the manifest and rendering markdown
//! happen elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use sw_source::{DocSource, FsSource};
//!
//! let source = FsSource::new("docs");
//! let manifest = source.fetch_manifest()?;
//! let markdown = source.fetch_document("alerting/rules.md")?;
//! ```

mod fs;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use fs::{DEFAULT_MANIFEST, FsSource};
pub use http::{DEFAULT_TIMEOUT, HttpSource};
#[cfg(feature = "mock")]
pub use mock::{MANIFEST_KEY, MockSource};
pub use source::{DocSource, SourceError, SourceErrorKind};
