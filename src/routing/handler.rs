//! Handler capability and per-request scope.
//!
//! # Design Decisions
//! - Handlers are trait objects so sub-apps stay opaque to the registry
//! - The registry snapshot that matched the request travels with it, so a
//!   handler that reverses names sees the same route table that routed it

use std::future::Future;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use futures_util::future::{BoxFuture, FutureExt};

use crate::routing::pattern::PathParams;
use crate::routing::reverse::{RequestContext, ReverseResolver};
use crate::routing::router::RouterRegistry;

/// A unit that can answer requests for a route.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request<Body>, scope: RequestScope) -> BoxFuture<'static, Response>;
}

/// Adapter turning an async closure into a [`Handler`].
pub struct HandlerFn<F>(F);

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<Body>, RequestScope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request<Body>, scope: RequestScope) -> BoxFuture<'static, Response> {
        (self.0)(request, scope).boxed()
    }
}

/// Wrap an async closure as a shareable handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Request<Body>, RequestScope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(HandlerFn(f))
}

/// Everything the dispatcher learned while routing a request.
#[derive(Clone)]
pub struct RequestScope {
    registry: Arc<RouterRegistry>,
    params: PathParams,
    route_name: Option<String>,
    context: Option<RequestContext>,
}

impl RequestScope {
    pub fn new(
        registry: Arc<RouterRegistry>,
        params: PathParams,
        route_name: Option<String>,
        context: Option<RequestContext>,
    ) -> Self {
        Self {
            registry,
            params,
            route_name,
            context,
        }
    }

    /// The registry snapshot that matched this request.
    pub fn registry(&self) -> &Arc<RouterRegistry> {
        &self.registry
    }

    /// Reverse resolver bound to the same snapshot.
    pub fn resolver(&self) -> ReverseResolver<'_> {
        self.registry.resolver()
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    /// Scheme and host of the request, if the request carried a host.
    pub fn context(&self) -> Option<&RequestContext> {
        self.context.as_ref()
    }
}
