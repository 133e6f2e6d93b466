//! Path pattern parsing, matching and expansion.
//!
//! # Responsibilities
//! - Parse relative path templates ("api/v1/orders/{id}/")
//! - Match a request path and capture parameters
//! - Expand a template back into a path (reverse resolution)
//!
//! # Design Decisions
//! - Patterns are relative; the leading slash is implied
//! - Literal matching is case-sensitive, trailing slashes are significant
//! - `{name}` captures one non-empty segment, `{*name}` captures the rest
//! - No regex: a single left-to-right scan per pattern
//! - Request paths arrive percent-encoded: literals are compared in encoded
//!   form, captures are decoded, and expansion encodes again so that
//!   expand-then-match returns the original values

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::routing::error::{ConfigurationError, ResolutionError};

/// Characters escaped when a template or value is written into a path.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a path (or path fragment), leaving '/' intact.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Param(String),
    Wildcard(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    parts: Vec<Part>,
}

impl PathPattern {
    /// Parse a relative path template.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ConfigurationError> {
        let raw = raw.into();

        if raw.starts_with('/') {
            return Err(invalid(&raw, "patterns are relative and must not start with '/'"));
        }
        if raw.contains("//") {
            return Err(invalid(&raw, "empty path segment"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid(&raw, "whitespace is not allowed"));
        }

        let mut parts = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        let mut rest = raw.as_str();

        while !rest.is_empty() {
            let Some(idx) = rest.find(['{', '}']) else {
                parts.push(Part::Literal(encode_path(rest)));
                break;
            };
            if rest.as_bytes()[idx] == b'}' {
                return Err(invalid(&raw, "unbalanced '}'"));
            }
            if idx > 0 {
                parts.push(Part::Literal(encode_path(&rest[..idx])));
            }

            let after = &rest[idx + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid(&raw, "unclosed '{'"))?;
            let inner = &after[..close];
            rest = &after[close + 1..];

            let (wildcard, name) = match inner.strip_prefix('*') {
                Some(name) => (true, name),
                None => (false, inner),
            };
            if !is_identifier(name) {
                return Err(invalid(
                    &raw,
                    format!("'{}' is not a valid parameter name", name),
                ));
            }
            if names.contains(&name) {
                return Err(invalid(&raw, format!("parameter '{}' appears twice", name)));
            }
            names.push(name);

            if wildcard {
                if !rest.is_empty() {
                    return Err(invalid(&raw, "a wildcard must end the pattern"));
                }
                parts.push(Part::Wildcard(name.to_string()));
            } else {
                if !(rest.is_empty() || rest.starts_with('/')) {
                    return Err(invalid(
                        &raw,
                        format!("parameter '{}' must be followed by '/' or end the pattern", name),
                    ));
                }
                parts.push(Part::Param(name.to_string()));
            }
        }

        Ok(Self { raw, parts })
    }

    /// The template as written, without the leading slash.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parameter names in template order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::Param(name) | Part::Wildcard(name) => Some(name.as_str()),
            Part::Literal(_) => None,
        })
    }

    /// Returns true if the template captures the remainder of the path.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.parts.last(), Some(Part::Wildcard(_)))
    }

    /// Match a request path, returning the captured parameters on success.
    ///
    /// Captured values are percent-decoded; a capture that does not decode
    /// to UTF-8 fails the match.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut rest = path.strip_prefix('/').unwrap_or(path);
        let mut params = PathParams::default();

        for part in &self.parts {
            match part {
                Part::Literal(literal) => rest = rest.strip_prefix(literal.as_str())?,
                Part::Param(name) => {
                    let end = rest.find('/').unwrap_or(rest.len());
                    if end == 0 {
                        return None;
                    }
                    params.push(name, &decode(&rest[..end])?);
                    rest = &rest[end..];
                }
                Part::Wildcard(name) => {
                    params.push(name, &decode(rest)?);
                    rest = "";
                }
            }
        }

        rest.is_empty().then_some(params)
    }

    /// Expand the template into an absolute, percent-encoded path.
    ///
    /// `lookup` supplies the value for each parameter; `route` is only used
    /// for error reporting.
    pub fn expand<'a, F>(&self, route: &str, lookup: F) -> Result<String, ResolutionError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut path = String::with_capacity(self.raw.len() + 1);
        path.push('/');

        for part in &self.parts {
            match part {
                Part::Literal(literal) => path.push_str(literal),
                Part::Param(name) | Part::Wildcard(name) => {
                    let value = lookup(name).ok_or_else(|| ResolutionError::MissingParameter {
                        name: route.to_string(),
                        param: name.clone(),
                    })?;
                    let segment = matches!(part, Part::Param(_));
                    if !is_safe_value(value, segment) {
                        return Err(ResolutionError::InvalidParameter {
                            param: name.clone(),
                            value: value.to_string(),
                        });
                    }
                    path.push_str(&encode_path(value));
                }
            }
        }

        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.raw)
    }
}

/// Parameters captured from a matched path, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: &str, value: &str) {
        self.values.push((name.to_string(), value.to_string()));
    }

    /// Look up a captured value by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn invalid(raw: &str, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidPattern {
        pattern: raw.to_string(),
        reason: reason.into(),
    }
}

fn decode(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|value| value.into_owned())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Values may not smuggle in query strings, fragments, escapes or
/// traversal segments. Segment captures additionally reject '/' and must
/// be non-empty.
fn is_safe_value(value: &str, segment: bool) -> bool {
    if segment && (value.is_empty() || value.contains('/')) {
        return false;
    }
    if value
        .chars()
        .any(|c| matches!(c, '?' | '#' | '%' | '\\') || c.is_whitespace() || c.is_control())
    {
        return false;
    }
    !value.split('/').any(|part| part == "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = PathPattern::parse("api/v1/cart/").unwrap();

        assert!(pattern.matches("/api/v1/cart/").is_some());
        assert!(pattern.matches("/api/v1/cart").is_none()); // Trailing slash is significant
        assert!(pattern.matches("/API/v1/cart/").is_none()); // Case sensitive
        assert!(pattern.matches("/api/v1/cart/items/").is_none());
    }

    #[test]
    fn test_empty_pattern_matches_root_only() {
        let pattern = PathPattern::parse("").unwrap();

        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/anything").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("api/v1/orders/{id}/items/{item_id}/").unwrap();

        let params = pattern.matches("/api/v1/orders/42/items/7/").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("item_id"), Some("7"));
        assert_eq!(params.len(), 2);

        // Empty segment never satisfies a parameter
        assert!(pattern.matches("/api/v1/orders//items/7/").is_none());
    }

    #[test]
    fn test_wildcard_capture() {
        let pattern = PathPattern::parse("static/{*path}").unwrap();

        let params = pattern.matches("/static/css/site.css").unwrap();
        assert_eq!(params.get("path"), Some("css/site.css"));

        let params = pattern.matches("/static/").unwrap();
        assert_eq!(params.get("path"), Some(""));
        assert!(pattern.has_wildcard());
    }

    #[test]
    fn test_parse_rejects_malformed_patterns() {
        for raw in [
            "/api/",
            "api//v1/",
            "api/{id",
            "api/id}/",
            "api/{1id}/",
            "api/{id}.json",
            "api/{*rest}/more",
            "api/{id}/{id}/",
            "api/ v1/",
        ] {
            assert!(
                matches!(PathPattern::parse(raw), Err(ConfigurationError::InvalidPattern { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_expand() {
        let pattern = PathPattern::parse("stores/{store_id}/products/{id}/").unwrap();
        let path = pattern
            .expand("store-product", |name| match name {
                "store_id" => Some("3"),
                "id" => Some("abc"),
                _ => None,
            })
            .unwrap();
        assert_eq!(path, "/stores/3/products/abc/");
    }

    #[test]
    fn test_expand_rejects_unsafe_values() {
        let pattern = PathPattern::parse("orders/{id}/").unwrap();

        for value in ["", "1/2", "..", "a?b", "a#b", "%2F", "a b"] {
            let err = pattern.expand("order-detail", |_| Some(value)).unwrap_err();
            assert!(matches!(err, ResolutionError::InvalidParameter { .. }), "{value:?}");
        }

        let err = pattern.expand("order-detail", |_| None).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::MissingParameter {
                name: "order-detail".into(),
                param: "id".into()
            }
        );
    }

    #[test]
    fn test_non_ascii_values_survive_expand_then_match() {
        let pattern = PathPattern::parse("products/{id}/").unwrap();

        let path = pattern.expand("product-detail", |_| Some("café")).unwrap();
        assert_eq!(path, "/products/caf%C3%A9/");
        assert_eq!(pattern.matches(&path).unwrap().get("id"), Some("café"));

        let path = pattern.expand("product-detail", |_| Some("<a>")).unwrap();
        assert_eq!(path, "/products/%3Ca%3E/");
        assert_eq!(pattern.matches(&path).unwrap().get("id"), Some("<a>"));

        // Invalid UTF-8 never matches
        assert!(pattern.matches("/products/%FF/").is_none());
    }

    #[test]
    fn test_non_ascii_literal_matches_encoded_request() {
        let pattern = PathPattern::parse("boutique/café/").unwrap();

        assert_eq!(pattern.as_str(), "boutique/café/");
        assert!(pattern.matches("/boutique/caf%C3%A9/").is_some());
        assert_eq!(pattern.expand("boutique", |_| None).unwrap(), "/boutique/caf%C3%A9/");
    }

    #[test]
    fn test_wildcard_expand_allows_nested_paths() {
        let pattern = PathPattern::parse("static/{*path}").unwrap();
        assert_eq!(
            pattern.expand("asset", |_| Some("img/logo.png")).unwrap(),
            "/static/img/logo.png"
        );
        assert!(pattern.expand("asset", |_| Some("../secret")).is_err());
    }
}
