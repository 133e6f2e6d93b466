//! Routing error definitions.

use thiserror::Error;

/// Errors raised while composing the route tree.
///
/// All of these are fatal: a registry that fails to build must keep the
/// process from accepting traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Two routes in the composed tree share a name.
    #[error("route name '{name}' is registered twice ('/{first}' and '/{second}')")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    /// A sub-app required by the API surface did not contribute a route table.
    #[error("required sub-app '{0}' has no route table")]
    MissingApp(String),

    /// A sub-app was registered that the API surface does not mount.
    #[error("sub-app '{0}' is not part of the API surface")]
    UnknownApp(String),

    /// The same sub-app label was registered twice.
    #[error("sub-app '{0}' was registered more than once")]
    DuplicateApp(String),

    /// A group or include prefix cannot be concatenated safely.
    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// A route pattern failed to parse.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An include was given a name; only endpoints can be reversed.
    #[error("include '/{prefix}' cannot be named '{name}'")]
    NamedInclude { prefix: String, name: String },

    /// A route name that must be resolvable at startup is not.
    #[error("required route '{name}' cannot be resolved: {source}")]
    UnresolvableName {
        name: String,
        #[source]
        source: ResolutionError,
    },
}

/// Errors raised by reverse resolution.
///
/// Outside of tests these only surface when build-time validation missed a
/// configuration defect, so callers never retry them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The name is absent from the registry's name index.
    #[error("no such named route '{0}'")]
    NoSuchRoute(String),

    /// Positional arguments do not line up with the route's parameters.
    #[error("route '{name}' takes {expected} parameter(s), {given} given")]
    ArgumentCount {
        name: String,
        expected: usize,
        given: usize,
    },

    /// A keyword argument for one of the route's parameters is missing.
    #[error("route '{name}' is missing parameter '{param}'")]
    MissingParameter { name: String, param: String },

    /// A keyword argument names a parameter the route does not have.
    #[error("route '{name}' has no parameter '{param}'")]
    UnexpectedParameter { name: String, param: String },

    /// The same keyword argument was given more than once.
    #[error("route '{name}' got parameter '{param}' more than once")]
    DuplicateParameter { name: String, param: String },

    /// A parameter value would change the shape of the generated path.
    #[error("value {value:?} is not allowed for parameter '{param}'")]
    InvalidParameter { param: String, value: String },

    /// Scheme and host do not form a valid base URL. Contexts built by
    /// [`RequestContext::from_request`](crate::routing::RequestContext::from_request)
    /// are checked up front, so this only comes from hand-built contexts.
    #[error("cannot build a URL for '{scheme}://{host}'")]
    InvalidHost { scheme: String, host: String },
}
