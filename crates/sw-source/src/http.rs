//! HTTP source.
//!
//! Fetches the manifest and documents from a documentation base URL, the
//! way a browser behind the gateway would (`<base>/manifest.json`,
//! `<base>/<path>`). Plain GET requests, no auth headers, no cache busting.

use std::time::Duration;

use ureq::Agent;

use crate::fs::DEFAULT_MANIFEST;
use crate::source::{DocSource, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Http";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Reads the manifest and documents over HTTP.
pub struct HttpSource {
    agent: Agent,
    base_url: String,
    manifest: String,
}

impl HttpSource {
    /// Create a source for `base_url` with the default manifest name and timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create a source with a custom global request timeout.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            manifest: DEFAULT_MANIFEST.to_owned(),
        }
    }

    /// Use a different manifest name (relative to the base URL).
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for a relative resource path.
    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> Result<String, SourceError> {
        let url = self.url_for(path);
        tracing::debug!(url = %url, "Fetching");

        let response = self.agent.get(&url).call().map_err(|e| transport_error(e, path))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(SourceError::http_status(status, path).with_backend(BACKEND));
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| transport_error(e, path))
    }
}

/// Classify a transport-level failure.
fn transport_error(err: ureq::Error, path: &str) -> SourceError {
    let kind = match err {
        ureq::Error::Timeout(_) => SourceErrorKind::Timeout,
        ureq::Error::BadUri(_) => SourceErrorKind::InvalidPath,
        ureq::Error::Io(_) | ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            SourceErrorKind::Unavailable
        }
        _ => SourceErrorKind::Other,
    };
    SourceError::new(kind)
        .with_backend(BACKEND)
        .with_path(path)
        .with_source(err)
}

impl DocSource for HttpSource {
    fn fetch_manifest(&self) -> Result<String, SourceError> {
        self.get(&self.manifest)
    }

    fn fetch_document(&self, path: &str) -> Result<String, SourceError> {
        self.get(path)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
