//! Filesystem source.

use std::path::{Component, Path, PathBuf};

use crate::source::{DocSource, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Default manifest filename inside the documentation directory.
pub const DEFAULT_MANIFEST: &str = "manifest.json";

/// Reads the manifest and documents from a local directory.
///
/// Document paths are resolved relative to the root directory. Absolute
/// paths and paths with `..` components are refused so a document request
/// can never read outside the root.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
    manifest: String,
}

impl FsSource {
    /// Create a source rooted at `root` with the default manifest name.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest: DEFAULT_MANIFEST.to_owned(),
        }
    }

    /// Use a different manifest filename (relative to the root).
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative document path to a file under the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(SourceError::new(SourceErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_path(path));
        }
        Ok(self.root.join(relative))
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        let file = self.resolve(path)?;
        tracing::debug!(file = %file.display(), "Reading document file");
        std::fs::read_to_string(&file)
            .map_err(|e| SourceError::io(e, Some(path.to_owned())).with_backend(BACKEND))
    }
}

impl DocSource for FsSource {
    fn fetch_manifest(&self) -> Result<String, SourceError> {
        self.read(&self.manifest)
    }

    fn fetch_document(&self, path: &str) -> Result<String, SourceError> {
        self.read(path)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
