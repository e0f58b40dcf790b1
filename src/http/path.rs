//! Request path parsing.

use axum::http::Uri;

/// A request target split into its parts.
///
/// Segments and query values are kept raw; nothing is percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// Path component, always starting with `/`.
    pub path: String,
    /// Non-empty path segments in order.
    pub segments: Vec<String>,
    /// Raw query string without the leading `?`, if one was given.
    pub query: Option<String>,
}

impl ParsedPath {
    /// Returns the first value for `name` in the query string.
    ///
    /// A key without `=` yields an empty value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
    }
}

/// Splits `uri` into path, segments and query.
#[must_use]
pub fn parse_path(uri: &Uri) -> ParsedPath {
    let path = uri.path();
    let path = if path.is_empty() { "/" } else { path };
    ParsedPath {
        path: path.to_string(),
        segments: path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        query: uri.query().filter(|q| !q.is_empty()).map(str::to_string),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedPath {
        let Ok(uri) = raw.parse::<Uri>() else {
            panic!("bad uri {raw}");
        };
        parse_path(&uri)
    }

    #[test]
    fn splits_path_and_query() {
        let parsed = parse("/events/data:set:a/listeners?verbose=1&x");
        assert_eq!(parsed.path, "/events/data:set:a/listeners");
        assert_eq!(parsed.segments, ["events", "data:set:a", "listeners"]);
        assert_eq!(parsed.query.as_deref(), Some("verbose=1&x"));
        assert_eq!(parsed.param("verbose"), Some("1"));
        assert_eq!(parsed.param("x"), Some(""));
        assert_eq!(parsed.param("missing"), None);
    }

    #[test]
    fn root_and_empty_query() {
        let parsed = parse("/?");
        assert_eq!(parsed.path, "/");
        assert!(parsed.segments.is_empty());
        assert_eq!(parsed.query, None);
    }

    #[test]
    fn absolute_uri_uses_path_only() {
        let parsed = parse("http://localhost:3000//a//b/");
        assert_eq!(parsed.path, "//a//b/");
        assert_eq!(parsed.segments, ["a", "b"]);
    }

    #[test]
    fn first_param_wins() {
        assert_eq!(parse("/?a=1&a=2").param("a"), Some("1"));
    }
}
