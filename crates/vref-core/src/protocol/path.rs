//! Navigation over `/`-delimited template paths.

/// Parent of a template path, or `None` at the root.
///
/// Surrounding whitespace and trailing slashes are ignored, so `"/a/b/"` and
/// `" /a/b "` both have the parent `"/a"`. A top-level segment's parent is `"/"`.
pub fn parent_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.rfind('/')? {
        0 => Some("/".to_string()),
        index => Some(trimmed[..index].to_string()),
    }
}

pub fn child_path(path: &str, id: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    format!("{trimmed}/{id}")
}
