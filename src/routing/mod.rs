//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registry Construction (at startup / reload):
//!     Mount[] (kind + RouteGroup trees)
//!     → router.rs (flatten, concatenate prefixes)
//!     → pattern.rs (compile full patterns)
//!     → name index, duplicate check
//!     → Freeze as immutable RouterRegistry
//!
//! Incoming Request (path)
//!     → router.rs (ordered scan, first match wins)
//!     → handler.rs (invoke with RequestScope)
//!
//! Reverse Resolution:
//!     name + args + RequestContext
//!     → reverse.rs (name index lookup, expand pattern)
//!     → absolute URL
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - Duplicate names are a build error, never silent shadowing

pub mod error;
pub mod handler;
pub mod pattern;
pub mod reverse;
pub mod route;
pub mod router;

pub use error::{ConfigurationError, ResolutionError};
pub use handler::{handler_fn, Handler, RequestScope};
pub use pattern::{PathParams, PathPattern};
pub use reverse::{RequestContext, ReverseArgs, ReverseResolver};
pub use route::{Mount, MountKind, Route, RouteGroup, RouteTarget};
pub use router::{CompiledRoute, RegistryBuilder, RouteMatch, RouterRegistry};
