//! Security headers.
//!
//! Every response carries a strict CSP plus `nosniff` and `DENY` framing.
//! Pages are server-rendered without scripts, so `script-src` is `'none'`.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy header value.
///
/// Images may come from a remote documentation host.
const CSP: &str = "default-src 'self'; \
                   script-src 'none'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data: http: https:; \
                   connect-src 'self'; \
                   form-action 'self'; \
                   frame-ancestors 'none'";

/// Headers set on every response, in order.
const HEADERS: [(&str, &str); 3] = [
    ("content-security-policy", CSP),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
];

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

fn header_layer((name, value): (&'static str, &'static str)) -> HeaderLayer {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

/// All security header layers as one stack.
pub(crate) fn layers()
-> ServiceBuilder<Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>> {
    let [csp, nosniff, frame] = HEADERS;
    ServiceBuilder::new()
        .layer(header_layer(csp))
        .layer(header_layer(nosniff))
        .layer(header_layer(frame))
}
