//! Theme toggle.
//!
//! Stores the preference in a cookie and redirects back, so pages can be
//! rendered with the right theme without client-side scripts.

use axum::extract::{Path, Query};
use axum::http::{HeaderValue, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use sw_config::Theme;

use crate::error::ServerError;
use crate::handlers::THEME_COOKIE;

/// One year.
const COOKIE_MAX_AGE: u32 = 60 * 60 * 24 * 365;

#[derive(Debug, Deserialize)]
pub(crate) struct ThemeQuery {
    #[serde(rename = "return")]
    return_to: Option<String>,
}

/// Handle GET /theme/{theme}.
pub(crate) async fn set_theme(
    Path(name): Path<String>,
    Query(query): Query<ThemeQuery>,
) -> Result<Response, ServerError> {
    let theme = Theme::parse(&name).ok_or(ServerError::UnknownTheme(name))?;
    let target = safe_return(query.return_to.as_deref());

    let cookie = format!(
        "{THEME_COOKIE}={}; Path=/; Max-Age={COOKIE_MAX_AGE}; SameSite=Lax",
        theme.as_str()
    );
    let mut response = Redirect::to(&target).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Only same-site paths are followed; anything else returns home.
///
/// Browsers drop tabs and newlines while parsing a `Location`, so targets
/// carrying control characters or whitespace are refused outright. The rest
/// must parse as a bare path (no scheme, no authority) that does not start
/// with `//`.
fn safe_return(target: Option<&str>) -> String {
    target
        .filter(|t| !t.chars().any(|c| c.is_control() || c.is_whitespace() || c == '\\'))
        .and_then(|t| t.parse::<Uri>().ok())
        .filter(|uri| uri.scheme().is_none() && uri.authority().is_none())
        .and_then(|uri| uri.path_and_query().cloned())
        .filter(|pq| pq.path().starts_with('/') && !pq.path().starts_with("//"))
        .map_or_else(|| "/".to_owned(), |pq| pq.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_safe_return() {
        assert_eq!(safe_return(Some("/help?doc=a.md")), "/help?doc=a.md");
        assert_eq!(safe_return(Some("//evil.example")), "/");
        assert_eq!(safe_return(Some("https://evil.example")), "/");
        assert_eq!(safe_return(Some("/\\evil.example")), "/");
        assert_eq!(safe_return(None), "/");
    }

    #[test]
    fn test_safe_return_rejects_control_characters() {
        // Decoded forms of `/%09/evil.example` and `/%0A/evil.example`.
        assert_eq!(safe_return(Some("/\t/evil.example")), "/");
        assert_eq!(safe_return(Some("/\n/evil.example")), "/");
        assert_eq!(safe_return(Some("/\r/evil.example")), "/");
        assert_eq!(safe_return(Some("/ /evil.example")), "/");
    }

    #[test]
    fn test_safe_return_keeps_path_and_query() {
        assert_eq!(
            safe_return(Some("/help?doc=alerting/rules.md&open=0")),
            "/help?doc=alerting/rules.md&open=0"
        );
    }
}
