/// Resolve a possibly repository-relative reference.
///
/// References that already carry an `http://` or `https://` scheme, or any
/// reference when no repository base is known, are returned unchanged.
/// Everything else is joined onto the base with a single `/`. No URL
/// validation is performed.
pub fn resolve_url(reference: &str, repository_base: Option<&str>) -> String {
    match repository_base {
        Some(base) if !is_absolute(reference) => format!("{base}/{reference}"),
        _ => reference.to_string(),
    }
}

fn is_absolute(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Normalize a repository URL into a browsable base.
///
/// Strips a leading `git+` and a trailing `.git`. Returns `None` when
/// nothing is left.
pub fn normalize_repository_url(url: &str) -> Option<String> {
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);

    (!url.is_empty()).then(|| url.to_string())
}
