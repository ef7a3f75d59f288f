//! Route keys and parent-directory arithmetic.

/// Registry key for a route.
///
/// Slashes inside the query string become underscores so that routes that
/// differ only by a path-like query parameter stay distinct and never look
/// like children of one another.
pub fn normalize_route(route: &str) -> String {
    match route.split_once('?') {
        Some((path, query)) => format!("{}?{}", path, query.replace('/', "_")),
        None => route.to_string(),
    }
}

/// Directory containing `path`: `"/a/b"` gives `"/a"`, `"/a"` gives `"/"`.
/// The root has no parent.
pub fn parent_dir(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(trimmed[..idx].to_string()),
        None => None,
    }
}

/// Absolute path without trailing slashes; `None` when not absolute.
pub(crate) fn clean_path(path: &str) -> Option<String> {
    if !path.starts_with('/') {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    Some(if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() })
}
