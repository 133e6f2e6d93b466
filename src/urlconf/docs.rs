//! API documentation routes.
//!
//! `schema/` publishes an OpenAPI document listing the registered paths;
//! `swagger-ui/` serves a browser UI pointed at it. Operation-level detail
//! belongs to the sub-apps and is not described here.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Map, Value};

use crate::config::SiteConfig;
use crate::routing::{handler_fn, ReverseArgs, RouteGroup, RouterRegistry};
use crate::urlconf::{SCHEMA_PATH, SWAGGER_UI_PATH};

const SWAGGER_UI_DIST: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5";

/// Title and version published in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
}

impl From<&SiteConfig> for ApiInfo {
    fn from(site: &SiteConfig) -> Self {
        Self {
            title: site.api_title.clone(),
            version: site.api_version.clone(),
        }
    }
}

/// Documentation routes, mounted at the root.
pub fn urls(site: &SiteConfig) -> RouteGroup {
    let info = Arc::new(ApiInfo::from(site));

    let schema_info = Arc::clone(&info);
    let schema = handler_fn(move |_, scope| {
        let info = Arc::clone(&schema_info);
        async move { Json(openapi_document(scope.registry(), &info)).into_response() }
    });

    let swagger_ui = handler_fn(move |_, scope| {
        let info = Arc::clone(&info);
        async move {
            match scope.resolver().reverse_path("schema", &ReverseArgs::none()) {
                Ok(schema_url) => Html(swagger_page(&info.title, &schema_url)).into_response(),
                Err(e) => e.into_response(),
            }
        }
    });

    RouteGroup::new()
        .named(SCHEMA_PATH, "schema", schema)
        .named(SWAGGER_UI_PATH, "swagger-ui", swagger_ui)
}

/// Build an OpenAPI 3 document with one path item per endpoint route.
///
/// Wildcard routes are skipped; when two routes share a template only the
/// first (the one that wins matching) is listed.
pub fn openapi_document(registry: &RouterRegistry, info: &ApiInfo) -> Value {
    let mut seen = HashSet::new();
    let mut paths = Map::new();

    for route in registry.routes() {
        let pattern = route.pattern();
        if pattern.has_wildcard() || !seen.insert(pattern.as_str()) {
            continue;
        }

        let parameters: Vec<Value> = pattern
            .param_names()
            .map(|name| {
                json!({
                    "name": name,
                    "in": "path",
                    "required": true,
                    "schema": { "type": "string" },
                })
            })
            .collect();

        let mut item = Map::new();
        if let Some(name) = route.name() {
            item.insert("summary".into(), Value::String(name.to_string()));
        }
        if !parameters.is_empty() {
            item.insert("parameters".into(), Value::Array(parameters));
        }
        item.insert("x-mount".into(), Value::String(route.mount().to_string()));

        paths.insert(pattern.to_string(), Value::Object(item));
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": info.title,
            "version": info.version,
        },
        "paths": paths,
    })
}

fn swagger_page(title: &str, schema_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <link rel="stylesheet" href="{dist}/swagger-ui.css">
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="{dist}/swagger-ui-bundle.js"></script>
    <script>
      window.onload = () => {{
        window.ui = SwaggerUIBundle({{ url: "{schema_url}", dom_id: "#swagger-ui" }});
      }};
    </script>
  </body>
</html>
"##,
        title = escape_html(title),
        dist = SWAGGER_UI_DIST,
        schema_url = schema_url,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
