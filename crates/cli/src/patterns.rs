use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One query per line; surrounding whitespace and blank lines are dropped.
pub(crate) fn read_pattern_file(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Positional query first, then the pattern file in file order. The matcher
/// credits a token to the first qualifying query, so this order decides
/// which score is printed when several queries qualify.
pub(crate) fn collect_queries(query: Option<&str>, pattern_file: Option<&Path>) -> Result<Vec<String>> {
    let mut queries: Vec<String> = query.map(str::to_string).into_iter().collect();
    if let Some(path) = pattern_file {
        let patterns = read_pattern_file(path)?;
        log::debug!("Read {} patterns from {}", patterns.len(), path.display());
        queries.extend(patterns);
    }
    Ok(queries)
}
