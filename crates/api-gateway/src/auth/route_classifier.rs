//! Public/protected classification of filtered routes.

/// Classification of an inbound path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No authentication required.
    Public,
    /// A valid token (header or derived from credentials) is required.
    Protected,
}

/// Classifies paths by substring containment against a fixed pattern list.
///
/// A path is `Public` iff it contains any pattern. The list is set at
/// construction and never changes.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    public_patterns: Vec<String>,
}

impl RouteClassifier {
    pub fn new(public_patterns: Vec<String>) -> Self {
        Self { public_patterns }
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self
            .public_patterns
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
        {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }
}

impl Default for RouteClassifier {
    fn default() -> Self {
        Self::new(vec!["/login".to_string()])
    }
}

/// True if `path` has a `.` or `..` segment, raw or percent-encoded.
///
/// The upstream URL is resolved by the HTTP client, which removes dot
/// segments (`/users/login/../1` becomes `/users/1`). Such paths would be
/// classified on a different path than the one the upstream receives.
/// Encoded and backslash separators count as separators.
pub fn has_dot_segment(path: &str) -> bool {
    let normalized = path
        .to_ascii_lowercase()
        .replace("%2e", ".")
        .replace("%2f", "/")
        .replace("%5c", "/")
        .replace('\\', "/");

    normalized
        .split('/')
        .any(|segment| segment == "." || segment == "..")
}
