use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a list file: one entry per line, blank lines ignored.
pub fn read_path_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read list file {}", path.display()))?;
    Ok(parse_path_list(&text))
}

pub fn parse_path_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join the last path component of `entry` to `folder`.
///
/// Lists are often written on another machine, so any directory part of the
/// entry (with `/` or `\` separators) is dropped.
pub fn resolve_in_folder(folder: &Path, entry: &str) -> PathBuf {
    let name = entry
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(entry);
    folder.join(name)
}
