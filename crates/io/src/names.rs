use std::path::Path;

use crate::csv::read_file_as_utf8;
use crate::LoadError;

/// Geography names, one per line. Lines are trimmed; blank lines and lines
/// starting with `#` are skipped. Order and duplicates are preserved.
pub fn read_names(path: &Path) -> Result<Vec<String>, LoadError> {
    let content = read_file_as_utf8(path)?;
    Ok(parse_names(&content))
}

pub fn parse_names(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
