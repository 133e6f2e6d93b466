//! Stand-in sub-apps.
//!
//! They publish the same route names the real apps do, so the route table,
//! reverse resolution and discovery work end to end, but every endpoint
//! answers `501 Not Implemented`.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::apps::{Apps, AuthViews, MountApp};
use crate::routing::{handler_fn, Handler, RouteGroup};

/// A sub-app whose routes exist but do nothing.
#[derive(Debug, Clone)]
pub struct PlaceholderApp {
    label: &'static str,
    routes: Vec<(&'static str, &'static str)>,
}

impl PlaceholderApp {
    /// `routes` is a list of (pattern, name) pairs.
    pub fn new(label: &'static str, routes: &[(&'static str, &'static str)]) -> Self {
        Self {
            label,
            routes: routes.to_vec(),
        }
    }
}

impl MountApp for PlaceholderApp {
    fn label(&self) -> &str {
        self.label
    }

    fn urls(&self) -> RouteGroup {
        self.routes
            .iter()
            .fold(RouteGroup::new(), |group, &(pattern, name)| {
                group.named(pattern, name, not_implemented(self.label, name))
            })
    }
}

/// Auth views that answer `501 Not Implemented`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAuth;

impl AuthViews for PlaceholderAuth {
    fn browsable_login(&self) -> RouteGroup {
        RouteGroup::new()
            .named("login/", "login", not_implemented("auth", "login"))
            .named("logout/", "logout", not_implemented("auth", "logout"))
    }

    fn token_obtain_pair(&self) -> Arc<dyn Handler> {
        not_implemented("auth", "token_obtain_pair")
    }

    fn token_refresh(&self) -> Arc<dyn Handler> {
        not_implemented("auth", "token_refresh")
    }
}

fn not_implemented(app: &'static str, route: &'static str) -> Arc<dyn Handler> {
    handler_fn(move |_, _| async move {
        (
            StatusCode::NOT_IMPLEMENTED,
            Json(json!({
                "detail": format!("'{}' is provided by the {} app, which is not installed.", route, app),
                "app": app,
                "route": route,
            })),
        )
            .into_response()
    })
}

/// The full collaborator set with the storefront's route names.
pub fn placeholder_apps() -> Apps {
    Apps::new()
        .with_admin(PlaceholderApp::new("admin", &[("", "admin-index")]))
        .with_auth(PlaceholderAuth)
        .with_api_app(PlaceholderApp::new(
            "cart",
            &[("cart/", "cart"), ("cart/items/{item_id}/", "cart-item")],
        ))
        .with_api_app(PlaceholderApp::new(
            "customers",
            &[
                ("customers/me/", "customer-profile"),
                ("customers/addresses/", "customer-addresses"),
            ],
        ))
        .with_api_app(PlaceholderApp::new(
            "orders",
            &[("orders/", "orders"), ("orders/{id}/", "order-detail")],
        ))
        .with_api_app(PlaceholderApp::new(
            "payments",
            &[("payments/", "payments"), ("payments/{id}/", "payment-detail")],
        ))
        .with_api_app(PlaceholderApp::new(
            "catalogue",
            &[
                ("products/", "products"),
                ("products/{id}/", "product-detail"),
                ("categories/", "categories"),
            ],
        ))
        .with_api_app(PlaceholderApp::new(
            "stores",
            &[("stores/", "store-list"), ("stores/{id}/", "store-detail")],
        ))
        .with_api_app(PlaceholderApp::new("wishlist", &[("wishlist/", "wishlist")]))
}
