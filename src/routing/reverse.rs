//! Reverse resolution: route name + parameters → URL.
//!
//! # Responsibilities
//! - Look up a route by name in the registry's index
//! - Bind positional or keyword arguments to the route's parameters
//! - Prefix the path with the request's scheme and host
//!
//! # Design Decisions
//! - Pure with respect to the registry; the request only supplies
//!   scheme and host, never route selection
//! - Unknown names are errors, never an empty string
//! - Positional and keyword arguments cannot be mixed

use axum::http::{header, Request};
use url::Url;

use crate::routing::error::ResolutionError;
use crate::routing::router::RouterRegistry;

/// Header consulted for the original scheme behind a TLS-terminating proxy.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Scheme and host of the request being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    scheme: String,
    host: String,
}

impl RequestContext {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Derive the context from a request.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority (HTTP/2). `X-Forwarded-Proto` is honoured only when
    /// `trust_forwarded_proto` is set and names `http` or `https`.
    /// Returns `None` when the host is missing or cannot form a URL, which
    /// callers answer as a client error.
    pub fn from_request<B>(request: &Request<B>, trust_forwarded_proto: bool) -> Option<Self> {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned)
            .or_else(|| request.uri().authority().map(|a| a.as_str().to_owned()))
            .filter(|h| !h.is_empty())?;

        let forwarded = trust_forwarded_proto
            .then(|| {
                request
                    .headers()
                    .get(X_FORWARDED_PROTO)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|v| v.split(',').next())
                    .map(|v| v.trim().to_ascii_lowercase())
                    .filter(|v| v == "http" || v == "https")
            })
            .flatten();

        let scheme = forwarded
            .or_else(|| request.uri().scheme_str().map(str::to_owned))
            .unwrap_or_else(|| "http".to_string());

        let context = Self { scheme, host };
        base_url(&context).is_some().then_some(context)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Arguments bound to a route's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReverseArgs {
    #[default]
    None,
    /// Values in the order the parameters appear in the pattern.
    Positional(Vec<String>),
    /// Values by parameter name.
    Keyword(Vec<(String, String)>),
}

impl ReverseArgs {
    pub fn none() -> Self {
        Self::None
    }

    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn keyword<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Keyword(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Resolves route names against one registry.
#[derive(Debug, Clone, Copy)]
pub struct ReverseResolver<'a> {
    registry: &'a RouterRegistry,
}

impl<'a> ReverseResolver<'a> {
    pub fn new(registry: &'a RouterRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `name` to an absolute path such as `/api/v1/cart/`.
    pub fn reverse_path(&self, name: &str, args: &ReverseArgs) -> Result<String, ResolutionError> {
        let route = self
            .registry
            .route(name)
            .ok_or_else(|| ResolutionError::NoSuchRoute(name.to_string()))?;
        let pattern = route.pattern();
        let params: Vec<&str> = pattern.param_names().collect();

        let bound: Vec<(&str, &str)> = match args {
            ReverseArgs::None => {
                if !params.is_empty() {
                    return Err(ResolutionError::ArgumentCount {
                        name: name.to_string(),
                        expected: params.len(),
                        given: 0,
                    });
                }
                Vec::new()
            }
            ReverseArgs::Positional(values) => {
                if values.len() != params.len() {
                    return Err(ResolutionError::ArgumentCount {
                        name: name.to_string(),
                        expected: params.len(),
                        given: values.len(),
                    });
                }
                params
                    .iter()
                    .copied()
                    .zip(values.iter().map(String::as_str))
                    .collect()
            }
            ReverseArgs::Keyword(pairs) => {
                if let Some((key, _)) = pairs
                    .iter()
                    .enumerate()
                    .find(|(idx, (key, _))| pairs[..*idx].iter().any(|(seen, _)| seen == key))
                    .map(|(_, pair)| pair)
                {
                    return Err(ResolutionError::DuplicateParameter {
                        name: name.to_string(),
                        param: key.clone(),
                    });
                }
                if let Some((key, _)) = pairs.iter().find(|(key, _)| !params.contains(&key.as_str())) {
                    return Err(ResolutionError::UnexpectedParameter {
                        name: name.to_string(),
                        param: key.clone(),
                    });
                }
                pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
            }
        };

        pattern.expand(name, |param| {
            bound
                .iter()
                .find(|(key, _)| *key == param)
                .map(|(_, value)| *value)
        })
    }

    /// Resolve `name` to a fully qualified URL for the given request.
    pub fn reverse(
        &self,
        name: &str,
        args: &ReverseArgs,
        context: &RequestContext,
    ) -> Result<String, ResolutionError> {
        let path = self.reverse_path(name, args)?;
        absolute_url(context, &path)
    }
}

/// `scheme://host/`, or `None` when the host carries anything but a
/// hostname and optional port.
fn base_url(context: &RequestContext) -> Option<Url> {
    if context
        .host
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '@' | '\\') || c.is_whitespace())
    {
        return None;
    }

    let base = Url::parse(&format!("{}://{}/", context.scheme, context.host)).ok()?;
    (!base.cannot_be_a_base() && base.host_str().is_some()).then_some(base)
}

fn absolute_url(context: &RequestContext, path: &str) -> Result<String, ResolutionError> {
    let invalid = || ResolutionError::InvalidHost {
        scheme: context.scheme.clone(),
        host: context.host.clone(),
    };

    base_url(context)
        .ok_or_else(invalid)?
        .join(path)
        .map(String::from)
        .map_err(|_| invalid())
}
