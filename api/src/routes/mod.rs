pub mod assess;
pub mod capabilities_route;
pub mod documents;
pub mod knowledge;
pub mod system_status_route;

use axum::http::HeaderMap;

/// `X-Request-Id` header or `-`.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
