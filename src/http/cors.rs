//! Permissive cross-origin headers attached to every handler response.

use super::{Request, Response};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
pub const ALLOW_HEADERS_ANY: &str = "*";
pub const MAX_AGE_SECS: u32 = 86_400;

/// Value for `Access-Control-Allow-Headers`
///
/// Reflects the preflight's `Access-Control-Request-Headers` when it carries
/// anything, otherwise allows any header.
pub fn allow_headers(request: &Request) -> &str {
    request
        .header(http::header::ACCESS_CONTROL_REQUEST_HEADERS)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ALLOW_HEADERS_ANY)
}

/// Appends the CORS header set for `request` to `response`
pub fn apply(response: Response, request: &Request) -> Response {
    response
        .with_header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .with_header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .with_header("Access-Control-Allow-Headers", allow_headers(request))
        .with_header("Access-Control-Max-Age", MAX_AGE_SECS.to_string())
}
