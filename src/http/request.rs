//! Request metadata helpers.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - IDs are UUID v4, propagated back on the response

use axum::http::HeaderMap;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID assigned by the request-id layer, if any.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
