//! Development-only routes: route-table diagnostics and static assets.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use axum::{
    body::Body,
    http::{Request, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::SiteConfig;
use crate::http::response::not_found;
use crate::routing::pattern::encode_path;
use crate::routing::{handler_fn, Handler, MountKind, RequestScope, RouteGroup, RouterRegistry};
use crate::urlconf::DEBUG_PREFIX;

#[derive(Debug, Serialize)]
struct MountInfo {
    kind: MountKind,
    prefix: String,
}

#[derive(Debug, Serialize)]
struct RegistrySummary {
    development_mode: bool,
    built_at: u64,
    mounts: Vec<MountInfo>,
    route_count: usize,
}

#[derive(Debug, Serialize)]
struct RouteInfo<'a> {
    pattern: String,
    name: Option<&'a str>,
    mount: MountKind,
}

/// Diagnostics routes under `__debug__/`.
pub fn urls() -> RouteGroup {
    RouteGroup::with_prefix(DEBUG_PREFIX)
        .named("", "debug-index", handler_fn(index))
        .named("routes/", "debug-routes", handler_fn(routes))
}

/// Static asset route under the configured static prefix.
pub fn static_urls(site: &SiteConfig) -> RouteGroup {
    RouteGroup::with_prefix(site.static_url.clone())
        .unnamed("{*path}", serve_static(PathBuf::from(&site.static_root)))
}

async fn index(_request: Request<Body>, scope: RequestScope) -> Response {
    Json(summarize(scope.registry())).into_response()
}

async fn routes(_request: Request<Body>, scope: RequestScope) -> Response {
    let registry = scope.registry();
    let routes: Vec<RouteInfo<'_>> = registry
        .routes()
        .iter()
        .map(|route| RouteInfo {
            pattern: route.pattern().to_string(),
            name: route.name(),
            mount: route.mount(),
        })
        .collect();
    Json(routes).into_response()
}

fn summarize(registry: &RouterRegistry) -> RegistrySummary {
    RegistrySummary {
        development_mode: registry.development_mode(),
        built_at: registry
            .built_at()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
        mounts: registry
            .mounts()
            .iter()
            .map(|mount| MountInfo {
                kind: mount.kind,
                prefix: format!("/{}", mount.group.prefix()),
            })
            .collect(),
        route_count: registry.routes().len(),
    }
}

/// Hands the captured remainder of the path to a file service rooted at `root`.
fn serve_static(root: PathBuf) -> Arc<dyn Handler> {
    let service = ServeDir::new(root);

    handler_fn(move |request: Request<Body>, scope: RequestScope| {
        let service = service.clone();
        async move {
            let path = scope.params().get("path").unwrap_or_default();
            let Ok(uri) = format!("/{}", encode_path(path)).parse::<Uri>() else {
                return not_found();
            };

            let (mut parts, body) = request.into_parts();
            parts.uri = uri;

            match service.oneshot(Request::from_parts(parts, body)).await {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_summary() {
        let ok = handler_fn(|_, _| async { StatusCode::OK.into_response() });
        let registry = RouterRegistry::builder()
            .development_mode(true)
            .mount(MountKind::Diagnostics, urls())
            .mount(MountKind::Root, RouteGroup::new().unnamed("", ok))
            .build()
            .unwrap();

        let summary = summarize(&registry);
        assert!(summary.development_mode);
        assert_eq!(summary.route_count, 3);
        assert_eq!(summary.mounts[0].prefix, "/__debug__/");
        assert_eq!(summary.mounts[1].prefix, "/");
        assert!(summary.built_at > 0);
    }

    #[test]
    fn test_static_group_shape() {
        let site = SiteConfig {
            static_url: "assets/".into(),
            ..SiteConfig::default()
        };
        let group = static_urls(&site);

        assert_eq!(group.prefix(), "assets/");
        assert_eq!(group.members().len(), 1);
        assert_eq!(group.members()[0].name(), None);
    }
}
