//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Document could not be loaded from the source.
    #[error("Page not found: {path}")]
    PageNotFound {
        /// Requested document path.
        path: String,
        /// Why loading failed.
        message: String,
    },

    /// Theme name other than `light` or `dark`.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Host and port do not form a socket address.
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound { path, message } => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path, "message": message}),
            ),
            Self::UnknownTheme(theme) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Unknown theme", "theme": theme}),
            ),
            Self::InvalidAddress(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_page_not_found_status() {
        let err = ServerError::PageNotFound {
            path: "missing.md".to_owned(),
            message: "not found".to_owned(),
        };

        assert_eq!(err.to_string(), "Page not found: missing.md");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_theme_status() {
        let response = ServerError::UnknownTheme("sepia".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
