//! Mock source implementation for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem or network access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use crate::source::{DocSource, SourceError, SourceErrorKind};

const BACKEND: &str = "Mock";

/// Mock source for testing.
///
/// Holds the manifest and documents in memory. Individual paths can be made
/// to fail or to respond slowly, and every fetch is counted.
///
/// # Example
///
/// ```ignore
/// use sw_source::{DocSource, MockSource};
///
/// let source = MockSource::new()
///     .with_manifest(r#"{"sections": []}"#)
///     .with_document("guide.md", "# Guide");
///
/// assert_eq!(source.fetch_document("guide.md").unwrap(), "# Guide");
/// assert_eq!(source.fetch_count("guide.md"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    manifest: RwLock<Option<String>>,
    documents: RwLock<HashMap<String, String>>,
    failures: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
    fetches: RwLock<HashMap<String, usize>>,
    manifest_fetches: RwLock<usize>,
}

impl MockSource {
    /// Create a new empty mock source.
    ///
    /// With no manifest configured, [`fetch_manifest`](DocSource::fetch_manifest)
    /// fails with [`SourceErrorKind::NotFound`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw manifest text.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_manifest(self, json: impl Into<String>) -> Self {
        *self.manifest.write().unwrap() = Some(json.into());
        self
    }

    /// Add a document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_document(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Make fetches of `path` fail with an HTTP 500 style error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, path: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(path.into());
        self
    }

    /// Delay fetches of `path` by blocking the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_delay(self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(path.into(), delay);
        self
    }

    /// Number of document fetches for `path` so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.read().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Total number of document fetches across all paths.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.fetches.read().unwrap().values().sum()
    }

    /// Number of manifest fetches so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn manifest_fetch_count(&self) -> usize {
        *self.manifest_fetches.read().unwrap()
    }

    fn pause(&self, key: &str) {
        let delay = self.delays.read().unwrap().get(key).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }

    fn failure(&self, key: &str) -> Option<SourceError> {
        self.failures
            .read()
            .unwrap()
            .contains(key)
            .then(|| SourceError::http_status(500, key).with_backend(BACKEND))
    }
}

/// Key used for manifest failures and delays.
pub const MANIFEST_KEY: &str = "manifest.json";

impl DocSource for MockSource {
    fn fetch_manifest(&self) -> Result<String, SourceError> {
        *self.manifest_fetches.write().unwrap() += 1;
        self.pause(MANIFEST_KEY);
        if let Some(err) = self.failure(MANIFEST_KEY) {
            return Err(err);
        }
        self.manifest.read().unwrap().clone().ok_or_else(|| {
            SourceError::new(SourceErrorKind::NotFound)
                .with_backend(BACKEND)
                .with_path(MANIFEST_KEY)
        })
    }

    fn fetch_document(&self, path: &str) -> Result<String, SourceError> {
        *self
            .fetches
            .write()
            .unwrap()
            .entry(path.to_owned())
            .or_default() += 1;
        self.pause(path);
        if let Some(err) = self.failure(path) {
            return Err(err);
        }
        self.documents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::not_found(path).with_backend(BACKEND))
    }

    fn describe(&self) -> String {
        "mock".to_owned()
    }
}
