//! Root discovery resource.
//!
//! Answers `GET /` with the absolute URLs of the main API resources so
//! clients can bootstrap without hardcoding paths. Every URL comes from
//! reverse resolution against the registry that routed the request.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::http::response::{bad_request, method_not_allowed, options_ok};
use crate::routing::{
    handler_fn, Handler, RequestContext, RequestScope, ResolutionError, ReverseArgs,
    ReverseResolver,
};

/// (document key, route name) pairs, in document order.
pub const DISCOVERY_ROUTES: [(&str, &str); 4] = [
    ("products", "products"),
    ("stores", "store-list"),
    ("cart", "cart"),
    ("orders", "orders"),
];

const ALLOW: &str = "GET, HEAD, OPTIONS";

/// Logical resource name → absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryDocument {
    entries: Vec<(&'static str, String)>,
}

impl DiscoveryDocument {
    /// Resolve every discovery route for the given request.
    ///
    /// Fails on the first name that does not resolve; there is no fallback.
    pub fn resolve(
        resolver: ReverseResolver<'_>,
        context: &RequestContext,
    ) -> Result<Self, ResolutionError> {
        let entries = DISCOVERY_ROUTES
            .iter()
            .map(|&(key, name)| {
                resolver
                    .reverse(name, &ReverseArgs::none(), context)
                    .map(|url| (key, url))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, url)| url.as_str())
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }
}

impl Serialize for DiscoveryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, url) in &self.entries {
            map.serialize_entry(key, url)?;
        }
        map.end()
    }
}

/// Handler for the catch-all root route.
pub fn handler() -> Arc<dyn Handler> {
    handler_fn(api_root)
}

async fn api_root(request: Request<Body>, scope: RequestScope) -> Response {
    let method = request.method();
    if method == Method::OPTIONS {
        return options_ok(ALLOW);
    }
    if method != Method::GET && method != Method::HEAD {
        return method_not_allowed(method, ALLOW);
    }

    let Some(context) = scope.context() else {
        return bad_request("Missing or invalid Host header.");
    };

    match DiscoveryDocument::resolve(scope.resolver(), context) {
        Ok(document) => Json(document).into_response(),
        Err(ResolutionError::InvalidHost { .. }) => bad_request("Missing or invalid Host header."),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{MountKind, RouteGroup, RouterRegistry};
    use axum::http::StatusCode;

    fn registry() -> RouterRegistry {
        let ok = || handler_fn(|_, _| async { StatusCode::OK.into_response() });
        let api = RouteGroup::with_prefix("api/v1/")
            .named("cart/", "cart", ok())
            .named("orders/", "orders", ok())
            .named("products/", "products", ok())
            .named("stores/", "store-list", ok());
        RouterRegistry::builder()
            .mount(MountKind::Api, api)
            .mount(MountKind::Root, RouteGroup::new().unnamed("", handler()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_document_contents_and_order() {
        let registry = registry();
        let ctx = RequestContext::new("http", "example.com");
        let document = DiscoveryDocument::resolve(registry.resolver(), &ctx).unwrap();

        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(
            json,
            r#"{"products":"http://example.com/api/v1/products/","stores":"http://example.com/api/v1/stores/","cart":"http://example.com/api/v1/cart/","orders":"http://example.com/api/v1/orders/"}"#
        );
        assert_eq!(document.get("cart"), Some("http://example.com/api/v1/cart/"));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let ok = handler_fn(|_, _| async { StatusCode::OK.into_response() });
        let registry = RouterRegistry::builder()
            .mount(MountKind::Api, RouteGroup::new().named("products/", "products", ok))
            .build()
            .unwrap();
        let ctx = RequestContext::new("http", "example.com");

        let err = DiscoveryDocument::resolve(registry.resolver(), &ctx).unwrap_err();
        assert_eq!(err, ResolutionError::NoSuchRoute("store-list".into()));
    }
}
