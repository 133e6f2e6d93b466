//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    response::IntoResponse,
};
use storefront_urls::apps::{Apps, AuthViews, MountApp};
use storefront_urls::routing::{handler_fn, Handler, RouteGroup};

/// A sub-app whose handlers answer `"<label> handler: <route>"`, followed by
/// any captured path parameters as ` key=value`.
pub struct EchoApp {
    label: &'static str,
    routes: Vec<(&'static str, &'static str)>,
}

impl EchoApp {
    pub fn new(label: &'static str, routes: &[(&'static str, &'static str)]) -> Self {
        Self {
            label,
            routes: routes.to_vec(),
        }
    }
}

impl MountApp for EchoApp {
    fn label(&self) -> &str {
        self.label
    }

    fn urls(&self) -> RouteGroup {
        self.routes
            .iter()
            .fold(RouteGroup::new(), |group, &(pattern, name)| {
                group.named(pattern, name, echo(self.label, name))
            })
    }
}

pub struct EchoAuth;

impl AuthViews for EchoAuth {
    fn browsable_login(&self) -> RouteGroup {
        RouteGroup::new().named("login/", "login", echo("auth", "login"))
    }

    fn token_obtain_pair(&self) -> Arc<dyn Handler> {
        echo("auth", "token_obtain_pair")
    }

    fn token_refresh(&self) -> Arc<dyn Handler> {
        echo("auth", "token_refresh")
    }
}

fn echo(label: &'static str, route: &'static str) -> Arc<dyn Handler> {
    handler_fn(move |_, scope| async move {
        let mut body = format!("{} handler: {}", label, route);
        for (key, value) in scope.params().iter() {
            body.push_str(&format!(" {}={}", key, value));
        }
        body.into_response()
    })
}

/// The full set of collaborators, registered out of order on purpose.
pub fn echo_apps() -> Apps {
    Apps::new()
        .with_admin(EchoApp::new("admin", &[("", "admin-index")]))
        .with_auth(EchoAuth)
        .with_api_app(EchoApp::new("wishlist", &[("wishlist/", "wishlist")]))
        .with_api_app(EchoApp::new(
            "cart",
            &[("cart/", "cart"), ("cart/items/{item_id}/", "cart-item")],
        ))
        .with_api_app(EchoApp::new("customers", &[("customers/me/", "customer-profile")]))
        .with_api_app(EchoApp::new(
            "orders",
            &[("orders/", "orders"), ("orders/{id}/", "order-detail")],
        ))
        .with_api_app(EchoApp::new("payments", &[("payments/", "payments")]))
        .with_api_app(EchoApp::new(
            "catalogue",
            &[("products/", "products"), ("products/{id}/", "product-detail")],
        ))
        .with_api_app(EchoApp::new("stores", &[("stores/", "store-list")]))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "example.com")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
