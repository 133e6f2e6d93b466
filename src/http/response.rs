//! Response helpers.
//!
//! # Responsibilities
//! - Uniform JSON error bodies (`{"detail": ...}`)
//! - Map routing errors to HTTP status codes
//!
//! # Design Decisions
//! - Resolution failures are configuration defects: logged at error
//!   level and answered with 500, never papered over
//! - Unmatched paths are an ordinary 404

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::routing::ResolutionError;

/// JSON error body with the given status.
pub fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": detail.into() }))).into_response()
}

pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found.")
}

pub fn bad_request(detail: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, detail)
}

/// 405 listing the allowed methods.
pub fn method_not_allowed(method: &Method, allow: &'static str) -> Response {
    let mut response = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method \"{}\" not allowed.", method),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(allow));
    response
}

/// Empty 200 answer to an OPTIONS request.
pub fn options_ok(allow: &'static str) -> Response {
    let mut response = StatusCode::OK.into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(allow));
    response
}

impl IntoResponse for ResolutionError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Reverse resolution failed; route configuration is inconsistent");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "A server error occurred.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_is_server_error() {
        let response = ResolutionError::NoSuchRoute("cart".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_method_not_allowed_sets_allow() {
        let response = method_not_allowed(&Method::POST, "GET, HEAD, OPTIONS");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD, OPTIONS");
    }
}
