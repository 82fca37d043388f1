#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Produce a filesystem-safe path component.
///
/// Unicode is transliterated to ASCII, anything outside `[A-Za-z0-9._-]`
/// becomes `_`, runs of `_` and `.` collapse, and trailing dots are trimmed.
/// Empty results fall back to `course`.
pub fn sanitize_component(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut last: Option<char> = None;

    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            ch
        } else {
            '_'
        };

        if (mapped == '_' || mapped == '.') && last == Some(mapped) {
            continue;
        }
        out.push(mapped);
        last = Some(mapped);
    }

    while out.ends_with('.') || out.ends_with('_') {
        out.pop();
    }

    if out.is_empty() || out == "." || out == ".." {
        return "course".to_string();
    }
    out
}

/// Lowercase hex SHA-256 of `value` mixed with `salt`.
pub fn salted_digest(value: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Salt derived from the current UTC time, in nanoseconds since the epoch.
pub fn timestamp_salt() -> String {
    OffsetDateTime::now_utc().unix_timestamp_nanos().to_string()
}

/// Immediate sub-directories of `dir`, sorted by name.
///
/// Returns an empty list when `dir` does not exist.
pub fn child_directories(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Could not read {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("Could not read entry in {}", dir.display()))?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_component_collapses_and_transliterates() {
        assert_eq!(sanitize_component("Café  Intro / 101"), "Cafe_Intro_101");
        assert_eq!(sanitize_component("..."), "course");
        assert_eq!(sanitize_component("CS1323"), "CS1323");
    }

    #[test]
    fn salted_digest_depends_on_salt() {
        let a = salted_digest("tag:x", "1");
        let b = salted_digest("tag:x", "2");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a, salted_digest("tag:x", "1"));
    }
}
