//! Route registry construction and lookup.
//!
//! # Responsibilities
//! - Flatten mounted groups into one ordered route table
//! - Build the name index used by reverse resolution
//! - Reject duplicate names and malformed prefixes at build time
//! - Look up the first route matching a request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) name lookup via HashMap
//! - O(n) ordered scan for path matching; first match wins
//! - Explicit no-match (`None`) rather than a silent default

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::routing::error::{ConfigurationError, ResolutionError};
use crate::routing::handler::Handler;
use crate::routing::pattern::{PathParams, PathPattern};
use crate::routing::reverse::{ReverseArgs, ReverseResolver};
use crate::routing::route::{Mount, MountKind, RouteGroup, RouteTarget};

/// A leaf route with its full pattern resolved.
#[derive(Clone)]
pub struct CompiledRoute {
    pattern: PathPattern,
    name: Option<String>,
    mount: MountKind,
    handler: Arc<dyn Handler>,
}

impl CompiledRoute {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Kind of the top-level group this route was mounted through.
    pub fn mount(&self) -> MountKind {
        self.mount
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field("mount", &self.mount)
            .finish()
    }
}

/// Result of matching a path against the registry.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a CompiledRoute,
    pub params: PathParams,
}

/// The complete, immutable route table of the process.
#[derive(Debug)]
pub struct RouterRegistry {
    mounts: Vec<Mount>,
    routes: Vec<CompiledRoute>,
    names: HashMap<String, usize>,
    development_mode: bool,
    built_at: SystemTime,
}

impl RouterRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Find the first route whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .matches(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    /// Look up a route by name.
    pub fn route(&self, name: &str) -> Option<&CompiledRoute> {
        self.names.get(name).map(|&idx| &self.routes[idx])
    }

    /// Reverse resolver over this registry.
    pub fn resolver(&self) -> ReverseResolver<'_> {
        ReverseResolver::new(self)
    }

    /// All leaf routes in match order.
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// Top-level groups in match order.
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Number of top-level groups of the given kind.
    pub fn mount_count(&self, kind: MountKind) -> usize {
        self.mounts.iter().filter(|m| m.kind == kind).count()
    }

    pub fn development_mode(&self) -> bool {
        self.development_mode
    }

    pub fn built_at(&self) -> SystemTime {
        self.built_at
    }
}

/// Collects mounts and validates them into a [`RouterRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    mounts: Vec<Mount>,
    development_mode: bool,
    required_names: Vec<String>,
}

impl RegistryBuilder {
    pub fn development_mode(mut self, enabled: bool) -> Self {
        self.development_mode = enabled;
        self
    }

    /// Append a top-level group. Earlier mounts take precedence.
    pub fn mount(mut self, kind: MountKind, group: RouteGroup) -> Self {
        self.mounts.push(Mount::new(kind, group));
        self
    }

    pub fn mounts(mut self, mounts: impl IntoIterator<Item = Mount>) -> Self {
        self.mounts.extend(mounts);
        self
    }

    /// Names that must resolve without parameters once built.
    pub fn require_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Flatten, index and validate the route tree.
    pub fn build(self) -> Result<RouterRegistry, ConfigurationError> {
        let mut routes = Vec::new();
        for mount in &self.mounts {
            flatten(mount.kind, "", &mount.group, &mut routes)?;
        }

        let mut names: HashMap<String, usize> = HashMap::new();
        for (idx, route) in routes.iter().enumerate() {
            let Some(name) = &route.name else { continue };
            if let Some(&first) = names.get(name) {
                return Err(ConfigurationError::DuplicateName {
                    name: name.clone(),
                    first: routes[first].pattern.as_str().to_string(),
                    second: route.pattern.as_str().to_string(),
                });
            }
            names.insert(name.clone(), idx);
        }

        let registry = RouterRegistry {
            mounts: self.mounts,
            routes,
            names,
            development_mode: self.development_mode,
            built_at: SystemTime::now(),
        };

        for name in &self.required_names {
            registry
                .resolver()
                .reverse_path(name, &ReverseArgs::none())
                .map_err(|source: ResolutionError| ConfigurationError::UnresolvableName {
                    name: name.clone(),
                    source,
                })?;
        }

        tracing::debug!(
            mounts = registry.mounts.len(),
            routes = registry.routes.len(),
            named = registry.names.len(),
            development_mode = registry.development_mode,
            "Route registry built"
        );

        Ok(registry)
    }
}

fn flatten(
    kind: MountKind,
    base: &str,
    group: &RouteGroup,
    out: &mut Vec<CompiledRoute>,
) -> Result<(), ConfigurationError> {
    validate_prefix(group.prefix())?;
    let base = format!("{}{}", base, group.prefix());

    for route in group.members() {
        match route.target() {
            RouteTarget::Endpoint(handler) => {
                let pattern = PathPattern::parse(format!("{}{}", base, route.pattern()))?;
                out.push(CompiledRoute {
                    pattern,
                    name: route.name().map(str::to_owned),
                    mount: kind,
                    handler: Arc::clone(handler),
                });
            }
            RouteTarget::Include(child) => {
                if let Some(name) = route.name() {
                    return Err(ConfigurationError::NamedInclude {
                        prefix: format!("{}{}", base, route.pattern()),
                        name: name.to_string(),
                    });
                }
                validate_prefix(route.pattern())?;
                flatten(kind, &format!("{}{}", base, route.pattern()), child, out)?;
            }
        }
    }

    Ok(())
}

/// A prefix must concatenate cleanly with whatever follows it.
pub fn validate_prefix(prefix: &str) -> Result<(), ConfigurationError> {
    let reason = if prefix.starts_with('/') {
        Some("prefixes are relative and must not start with '/'")
    } else if !prefix.is_empty() && !prefix.ends_with('/') {
        Some("a non-empty prefix must end with '/'")
    } else if prefix.contains("//") {
        Some("empty path segment")
    } else if prefix.chars().any(char::is_whitespace) {
        Some("whitespace is not allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigurationError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
