//! Source trait and error types.
//!
//! Provides the [`DocSource`] trait for fetching the manifest and documents,
//! along with [`SourceError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! Document paths are the relative slugs found in the manifest
//! (e.g., `"overview.md"`, `"alerting/rules.md"`). Backends resolve them
//! against their own document base.

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Resource does not exist (HTTP 404, missing file).
    NotFound,
    /// Access refused (HTTP 401/403, file permissions).
    PermissionDenied,
    /// Path is not acceptable to the backend.
    InvalidPath,
    /// Backend is unreachable or failing (connection errors, HTTP 5xx).
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

impl SourceErrorKind {
    /// Map a non-success HTTP status to an error kind.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            404 | 410 => Self::NotFound,
            401 | 403 => Self::PermissionDenied,
            400 | 414 => Self::InvalidPath,
            408 | 504 => Self::Timeout,
            500..=599 => Self::Unavailable,
            _ => Self::Other,
        }
    }
}

/// Source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// HTTP status for responses that arrived with a non-success status.
    pub status: Option<u16>,
    /// Requested path or URL (if applicable).
    pub path: Option<String>,
    /// Backend identifier (e.g., "Fs", "Http", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            status: None,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create an error for a non-success HTTP status.
    #[must_use]
    pub fn http_status(status: u16, path: impl Into<String>) -> Self {
        let mut error = Self::new(SourceErrorKind::from_status(status)).with_path(path);
        error.status = Some(status);
        error
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => SourceErrorKind::Timeout,
            std::io::ErrorKind::InvalidData => SourceErrorKind::Other,
            _ => SourceErrorKind::Unavailable,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind (HTTP 404): message (path: foo.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidPath => "Invalid path",
            SourceErrorKind::Unavailable => "Unavailable",
            SourceErrorKind::Timeout => "Timeout",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Source of the documentation manifest and documents.
///
/// Calls are blocking; async callers should run them on a blocking pool.
/// Implementations do not check document paths against the manifest: any
/// path handed to [`fetch_document`](DocSource::fetch_document) is fetched
/// as-is, subject only to the backend's own path rules.
pub trait DocSource: Send + Sync {
    /// Fetch the raw manifest text from the fixed manifest location.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure or a non-success response.
    fn fetch_manifest(&self) -> Result<String, SourceError>;

    /// Fetch the raw markdown text of one document.
    ///
    /// # Arguments
    ///
    /// * `path` - Relative document path from the manifest
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure or a non-success response.
    fn fetch_document(&self, path: &str) -> Result<String, SourceError>;

    /// Human-readable description of where documents come from (for logs).
    fn describe(&self) -> String;
}
