//! Stateless helper functions: path-syntax validation, byte-size formatting
//! and parent-directory preparation. No process-wide state.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{FileKitError, Result};
use crate::ioerr::classify;

/// Validate path syntax before any I/O side effect.
///
/// Rejects empty paths, NUL bytes, and (on Windows) the characters the OS
/// forbids in filenames. Fails fast with `InvalidArgument`.
pub fn validate_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(FileKitError::InvalidArgument(
            "path must not be empty".into(),
        ));
    }

    for component in path.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        let Some(s) = part.to_str() else {
            // Non-UTF-8 names are legal on Unix; nothing more to check.
            continue;
        };
        if s.contains('\0') {
            return Err(FileKitError::InvalidArgument(format!(
                "path component '{s}' contains a NUL byte"
            )));
        }
        #[cfg(windows)]
        if let Some(bad) = s.chars().find(|c| matches!(c, '<' | '>' | '"' | '|' | '?' | '*') || (*c as u32) < 0x20)
        {
            return Err(FileKitError::InvalidArgument(format!(
                "path component '{s}' contains invalid character {bad:?}"
            )));
        }
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists, creating it when needed.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(classify("create parent directory", parent))?;
    }
    Ok(())
}

/// Resolve symlinks for path comparison; falls back to the raw path when the
/// target does not exist yet.
pub(crate) fn canonical_or_self(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Format a byte count for humans (binary units, two decimals above bytes).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
