//! Storefront URL configuration.
//!
//! # Layout
//! ```text
//! /__debug__/        diagnostics           (development mode only)
//! /admin/            admin app
//! /auth/             browsable login, token/, token/refresh/
//! /api/v1/           cart, customers, orders, payments,
//!                    catalogue, stores, wishlist
//! /schema/           OpenAPI document
//! /swagger-ui/       interactive docs
//! /<static_url>      static assets         (development mode only)
//! /                  discovery root
//! ```
//!
//! # Design Decisions
//! - Mount order above is match precedence
//! - Development-only groups are added by a pure function of the site
//!   settings, so a production build never contains them
//! - Discovery names are checked while building, not on first request

pub mod diagnostics;
pub mod discovery;
pub mod docs;

use crate::apps::Apps;
use crate::config::SiteConfig;
use crate::routing::{ConfigurationError, Mount, MountKind, RouteGroup, RouterRegistry};

pub const DEBUG_PREFIX: &str = "__debug__/";
pub const ADMIN_PREFIX: &str = "admin/";
pub const AUTH_PREFIX: &str = "auth/";
pub const API_PREFIX: &str = "api/v1/";
pub const SCHEMA_PATH: &str = "schema/";
pub const SWAGGER_UI_PATH: &str = "swagger-ui/";

/// Compose the full route registry from the site settings and sub-apps.
pub fn build_urlconf(site: &SiteConfig, apps: &Apps) -> Result<RouterRegistry, ConfigurationError> {
    let admin = RouteGroup::with_prefix(ADMIN_PREFIX).include("", apps.admin()?.urls());

    let auth_views = apps.auth()?;
    let auth = RouteGroup::with_prefix(AUTH_PREFIX)
        .include("", auth_views.browsable_login())
        .named("token/", "token_obtain_pair", auth_views.token_obtain_pair())
        .named("token/refresh/", "token_refresh", auth_views.token_refresh());

    let api = apps
        .api_apps()?
        .into_iter()
        .fold(RouteGroup::with_prefix(API_PREFIX), |group, app| {
            group.include("", app.urls())
        });

    let base = vec![
        Mount::new(MountKind::Admin, admin),
        Mount::new(MountKind::Auth, auth),
        Mount::new(MountKind::Api, api),
        Mount::new(MountKind::Docs, docs::urls(site)),
    ];

    let registry = RouterRegistry::builder()
        .development_mode(site.development_mode)
        .mounts(apply_environment(site, base))
        .mount(MountKind::Root, RouteGroup::new().unnamed("", discovery::handler()))
        .require_names(discovery::DISCOVERY_ROUTES.iter().map(|&(_, name)| name))
        .build()?;

    tracing::info!(
        mounts = registry.mounts().len(),
        routes = registry.routes().len(),
        development_mode = registry.development_mode(),
        "URL configuration built"
    );

    Ok(registry)
}

/// Splice the development-only groups around the base mounts.
///
/// Diagnostics go first so nothing can shadow them; static assets go last
/// so they never shadow an API route.
pub fn apply_environment(site: &SiteConfig, base: Vec<Mount>) -> Vec<Mount> {
    if !site.development_mode {
        return base;
    }

    let mut mounts = Vec::with_capacity(base.len() + 2);
    mounts.push(Mount::new(MountKind::Diagnostics, diagnostics::urls()));
    mounts.extend(base);
    mounts.push(Mount::new(MountKind::Static, diagnostics::static_urls(site)));
    mounts
}
