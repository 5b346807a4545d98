//! Path filters applied to `/`-separated paths relative to the search root.

/// Prefixes that survive normalization; `""`, `.` and `/` select nothing.
fn prefixes(raw: &[String]) -> impl Iterator<Item = String> + '_ {
    raw.iter()
        .map(|p| normalize_filter_path(p))
        .filter(|p| !p.is_empty())
}

fn pattern(file_pattern: Option<&str>) -> Option<&str> {
    file_pattern.map(str::trim).filter(|p| !p.is_empty())
}

/// True when any of the filters would reject something.
pub fn is_active(
    include_paths: &[String],
    exclude_paths: &[String],
    file_pattern: Option<&str>,
) -> bool {
    prefixes(include_paths).next().is_some()
        || prefixes(exclude_paths).next().is_some()
        || pattern(file_pattern).is_some()
}

/// Include prefixes (any one must match when given), then exclude prefixes,
/// then the file pattern.
pub fn path_allowed(
    rel_path: &str,
    include_paths: &[String],
    exclude_paths: &[String],
    file_pattern: Option<&str>,
) -> bool {
    let rel_path = normalize_separators(rel_path);

    let mut includes = prefixes(include_paths).peekable();
    if includes.peek().is_some() && !includes.any(|prefix| under_prefix(&prefix, &rel_path)) {
        return false;
    }
    if prefixes(exclude_paths).any(|prefix| under_prefix(&prefix, &rel_path)) {
        return false;
    }
    pattern(file_pattern).map_or(true, |p| matches_file_pattern(&rel_path, p))
}

/// True when any directory or file segment of `rel_path` equals one of
/// `segments`, ignoring ASCII case. `archive/Old/flow.bpmn` is caught by `old`,
/// `older/flow.bpmn` is not.
pub fn has_excluded_segment(rel_path: &str, segments: &[String]) -> bool {
    normalize_separators(rel_path)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| {
            segments
                .iter()
                .any(|excluded| segment.eq_ignore_ascii_case(excluded.trim()))
        })
}

/// Extension check against a configured list; a leading dot in the list is tolerated.
pub fn extension_allowed(rel_path: &str, extensions: &[String]) -> bool {
    let rel_path = normalize_separators(rel_path);
    let file_name = rel_path.rsplit('/').next().unwrap_or(&rel_path);
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    if stem.is_empty() {
        return false;
    }
    extensions
        .iter()
        .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// `./billing/` and `billing` are the same prefix.
fn normalize_filter_path(raw: &str) -> String {
    let value = normalize_separators(raw.trim());
    let mut value = value.as_str();
    while let Some(rest) = value.strip_prefix("./") {
        value = rest;
    }
    match value.trim_matches('/') {
        "." => String::new(),
        other => other.to_string(),
    }
}

/// `path` is `prefix` itself or lies below it.
fn under_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Plain text is a substring test; `*` or `?` makes it a glob. An invalid
/// glob matches nothing.
fn matches_file_pattern(path: &str, pattern: &str) -> bool {
    if !pattern.contains(['*', '?']) {
        return path.contains(pattern);
    }
    glob::Pattern::new(pattern).is_ok_and(|p| p.matches(path))
}
