//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router that funnels every request into the dispatcher
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Dispatch requests through the current route registry
//! - Rebuild and atomically swap the registry on config reload
//! - Observability (metrics, request IDs)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::apps::Apps;
use crate::config::{RouterConfig, SiteConfig};
use crate::http::request::request_id;
use crate::http::response::not_found;
use crate::observability::metrics;
use crate::routing::{ConfigurationError, RequestContext, RequestScope, RouterRegistry};
use crate::urlconf::build_urlconf;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Active registry; replaced wholesale on reload.
    pub registry: Arc<ArcSwap<RouterRegistry>>,
    /// Reloadable; read once per request.
    pub trust_forwarded_proto: Arc<AtomicBool>,
}

/// HTTP server for the storefront API surface.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    reloader: Reloader,
}

impl HttpServer {
    /// Build the route registry and the server around it.
    ///
    /// Fails if the route configuration is invalid; nothing is bound yet.
    pub fn new(config: RouterConfig, apps: Apps) -> Result<Self, ConfigurationError> {
        let registry = build_urlconf(&config.site, &apps)?;

        let state = AppState {
            registry: Arc::new(ArcSwap::from_pointee(registry)),
            trust_forwarded_proto: Arc::new(AtomicBool::new(config.http.trust_forwarded_proto)),
        };
        let reloader = Reloader {
            state: state.clone(),
            apps,
            running: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            reloader,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.http.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.http.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Snapshot of the active registry.
    pub fn registry(&self) -> Arc<RouterRegistry> {
        self.reloader.state.registry.load_full()
    }

    /// Apply a reloaded config: rebuild and swap the registry, then update
    /// `http.trust_forwarded_proto`.
    ///
    /// Listener, timeout, body limit and observability settings are fixed
    /// when the server is built; changes to them are logged and ignored.
    /// On error nothing is applied.
    pub fn reload(&self, config: &RouterConfig) -> Result<(), ConfigurationError> {
        self.reloader.apply(config)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` rebuild the registry; the server
    /// stops when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            development_mode = self.config.site.development_mode,
            "HTTP server starting"
        );

        let reloader = self.reloader.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => {
                            if let Err(e) = reloader.apply(&config) {
                                tracing::error!(
                                    error = %e,
                                    "Rejected reloaded route configuration. Keeping current registry."
                                );
                            }
                        }
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Applies reloaded configs to the state shared with the dispatcher.
#[derive(Clone)]
struct Reloader {
    state: AppState,
    apps: Apps,
    /// The config the router and its middleware were built from.
    running: RouterConfig,
}

impl Reloader {
    fn apply(&self, config: &RouterConfig) -> Result<(), ConfigurationError> {
        swap_registry(&self.state.registry, &self.apps, &config.site)?;

        let trust = config.http.trust_forwarded_proto;
        if self.state.trust_forwarded_proto.swap(trust, Ordering::Relaxed) != trust {
            tracing::info!(trust_forwarded_proto = trust, "Forwarded-proto trust updated");
        }

        for field in restart_only_changes(&self.running, config) {
            tracing::warn!(field, "Config change requires a restart; keeping running value");
        }
        Ok(())
    }
}

fn swap_registry(
    active: &ArcSwap<RouterRegistry>,
    apps: &Apps,
    site: &SiteConfig,
) -> Result<(), ConfigurationError> {
    let registry = build_urlconf(site, apps)?;
    let routes = registry.routes().len();
    active.store(Arc::new(registry));
    tracing::info!(
        routes,
        development_mode = site.development_mode,
        "Route registry swapped"
    );
    Ok(())
}

/// Fields that differ from the running config but cannot change live.
fn restart_only_changes(running: &RouterConfig, new: &RouterConfig) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if running.listener != new.listener {
        fields.push("listener.bind_address");
    }
    if running.http.request_timeout_secs != new.http.request_timeout_secs {
        fields.push("http.request_timeout_secs");
    }
    if running.http.max_body_size != new.http.max_body_size {
        fields.push("http.max_body_size");
    }
    if running.observability != new.observability {
        fields.push("observability");
    }
    fields
}

/// Main dispatcher.
/// Matches the path against one registry snapshot and invokes the route's handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let registry = state.registry.load_full();

    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let Some(matched) = registry.match_path(&path) else {
        tracing::debug!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return not_found();
    };

    let route_name = matched.route.name().map(str::to_owned);
    let route_label = route_name
        .clone()
        .unwrap_or_else(|| matched.route.pattern().to_string());
    let handler = Arc::clone(matched.route.handler());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route_label,
        mount = %matched.route.mount(),
        "Dispatching request"
    );

    let trust_forwarded_proto = state.trust_forwarded_proto.load(Ordering::Relaxed);
    let context = RequestContext::from_request(&request, trust_forwarded_proto);
    let scope = RequestScope::new(Arc::clone(&registry), matched.params, route_name, context);

    let response = handler.call(request, scope).await;

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        &route_label,
        start_time,
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_only_changes() {
        let running = RouterConfig::default();

        let mut new = running.clone();
        new.site.development_mode = true;
        new.http.trust_forwarded_proto = true;
        assert!(restart_only_changes(&running, &new).is_empty());

        new.http.request_timeout_secs = 5;
        new.http.max_body_size = 1024;
        new.observability.log_level = "debug".into();
        assert_eq!(
            restart_only_changes(&running, &new),
            vec!["http.request_timeout_secs", "http.max_body_size", "observability"]
        );
    }
}
