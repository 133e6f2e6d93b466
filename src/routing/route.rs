//! Route and route group definitions.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::routing::handler::Handler;

/// What a route points at.
#[derive(Clone)]
pub enum RouteTarget {
    /// A leaf route answered by a handler.
    Endpoint(Arc<dyn Handler>),
    /// A nested group mounted under the route's pattern.
    Include(RouteGroup),
}

/// A path pattern bound to a handler or a nested group.
#[derive(Clone)]
pub struct Route {
    pattern: String,
    target: RouteTarget,
    name: Option<String>,
}

impl Route {
    /// Create an unnamed leaf route.
    pub fn endpoint(pattern: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            pattern: pattern.into(),
            target: RouteTarget::Endpoint(handler),
            name: None,
        }
    }

    /// Mount a nested group under `prefix`.
    pub fn include(prefix: impl Into<String>, group: RouteGroup) -> Self {
        Self {
            pattern: prefix.into(),
            target: RouteTarget::Include(group),
            name: None,
        }
    }

    /// Name the route for reverse resolution. An empty name leaves it unnamed.
    ///
    /// Only endpoints can be named; a named include fails the registry build.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Route");
        s.field("pattern", &self.pattern).field("name", &self.name);
        match &self.target {
            RouteTarget::Endpoint(_) => s.field("target", &"<handler>"),
            RouteTarget::Include(group) => s.field("target", group),
        };
        s.finish()
    }
}

/// An ordered, prefixable collection of routes.
///
/// Order is match precedence: the first member whose full pattern matches
/// wins.
#[derive(Debug, Clone, Default)]
pub struct RouteGroup {
    prefix: String,
    members: Vec<Route>,
}

impl RouteGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group whose members all live under `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            members: Vec::new(),
        }
    }

    pub fn route(mut self, route: Route) -> Self {
        self.members.push(route);
        self
    }

    /// Add a named leaf route.
    pub fn named(
        self,
        pattern: impl Into<String>,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        self.route(Route::endpoint(pattern, handler).named(name))
    }

    /// Add an unnamed leaf route.
    pub fn unnamed(self, pattern: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        self.route(Route::endpoint(pattern, handler))
    }

    /// Nest another group under `prefix`.
    pub fn include(self, prefix: impl Into<String>, group: RouteGroup) -> Self {
        self.route(Route::include(prefix, group))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn members(&self) -> &[Route] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Role of a top-level group in the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    Diagnostics,
    Admin,
    Auth,
    Api,
    Docs,
    Static,
    Root,
}

impl fmt::Display for MountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MountKind::Diagnostics => "diagnostics",
            MountKind::Admin => "admin",
            MountKind::Auth => "auth",
            MountKind::Api => "api",
            MountKind::Docs => "docs",
            MountKind::Static => "static",
            MountKind::Root => "root",
        };
        f.write_str(label)
    }
}

/// A top-level group together with its role.
#[derive(Debug, Clone)]
pub struct Mount {
    pub kind: MountKind,
    pub group: RouteGroup,
}

impl Mount {
    pub fn new(kind: MountKind, group: RouteGroup) -> Self {
        Self { kind, group }
    }
}
