//! Collision-free name resolution.
//!
//! Pure advisory functions that, given a path whose name or extension may
//! already be in use, compute an available path by appending or incrementing
//! a numeric suffix. The resolver never mutates the filesystem; a collision
//! between resolution and actual creation is possible and first-writer-wins
//! (callers that need exclusivity open with `create_new`).
//!
//! Counter arithmetic: when the target part already ends in digits with value
//! `V`, the counter starts at `V + 1` and advances by `V + 1` per probe, so
//! the numeric progression can skip values ("log7" -> "log8" -> "log16").
//! This irregular step is observable behavior and is kept as-is.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Which part of the filename the numeric suffix is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPart {
    /// The filename without its (last) extension.
    Name,
    /// The extension. A missing extension counts as empty and yields a bare
    /// numeric extension such as `.1`.
    Extension,
}

/// Split the longest run of trailing ASCII digits off `s`.
///
/// Returns the stripped prefix and the parsed value. A run that does not fit
/// in `u64` is treated as plain text (no suffix).
fn split_trailing_digits(s: &str) -> (&str, Option<u64>) {
    let digits_at = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digits_at {
        Some(i) => match s[i..].parse::<u64>() {
            Ok(v) => (&s[..i], Some(v)),
            Err(_) => (s, None),
        },
        None => (s, None),
    }
}

/// Join a stripped part with the separator and counter.
/// The separator is dropped when the stripped part is empty so a bare counter
/// is produced ("" -> "1", never "_1").
fn with_counter(stripped: &OsStr, separator: &str, counter: u64) -> OsString {
    let mut out = stripped.to_os_string();
    if !stripped.is_empty() && !separator.is_empty() {
        out.push(separator);
    }
    out.push(counter.to_string());
    out
}

/// Compute an available path for `path` by suffixing a counter onto `part`.
///
/// The candidate always carries a counter, even when `path` itself does not
/// exist: a fresh `report.txt` resolved on `Name` yields `report1.txt`, and a
/// fresh extensionless `T` resolved on `Extension` yields `T.1`.
pub fn resolve_incremented(path: &Path, part: PathPart, separator: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let ext = path.extension();

    let target: &OsStr = match part {
        PathPart::Name => stem,
        PathPart::Extension => ext.unwrap_or_default(),
    };

    // Non-UTF-8 parts cannot be digit-scanned; treat them as suffix-free.
    let (stripped, value): (OsString, Option<u64>) = match target.to_str() {
        Some(s) => {
            let (prefix, v) = split_trailing_digits(s);
            (OsString::from(prefix), v)
        }
        None => (target.to_os_string(), None),
    };

    let (mut counter, step) = match value {
        Some(v) => (v + 1, v + 1),
        None => (1, 1),
    };

    loop {
        let part_with_counter = with_counter(&stripped, separator, counter);
        let mut name = OsString::new();
        match part {
            PathPart::Name => {
                name.push(&part_with_counter);
                if let Some(e) = ext {
                    name.push(".");
                    name.push(e);
                }
            }
            PathPart::Extension => {
                name.push(stem);
                name.push(".");
                name.push(&part_with_counter);
            }
        }
        let candidate = path.with_file_name(&name);
        if !candidate.exists() {
            trace!(requested = %path.display(), resolved = %candidate.display(), "resolved incremented name");
            return candidate;
        }
        counter += step;
    }
}

/// Directory variant: the counter is applied to the whole directory name
/// (directories have no stem/extension split).
pub fn resolve_incremented_folder(path: &Path, separator: &str) -> PathBuf {
    let name = path.file_name().unwrap_or_default();

    let (stripped, value): (OsString, Option<u64>) = match name.to_str() {
        Some(s) => {
            let (prefix, v) = split_trailing_digits(s);
            (OsString::from(prefix), v)
        }
        None => (name.to_os_string(), None),
    };

    let (mut counter, step) = match value {
        Some(v) => (v + 1, v + 1),
        None => (1, 1),
    };

    loop {
        let candidate = path.with_file_name(with_counter(&stripped, separator, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn trailing_digits_split() {
        assert_eq!(split_trailing_digits("log7"), ("log", Some(7)));
        assert_eq!(split_trailing_digits("v2copy"), ("v2copy", None));
        assert_eq!(split_trailing_digits("report"), ("report", None));
        assert_eq!(split_trailing_digits("42"), ("", Some(42)));
        assert_eq!(split_trailing_digits(""), ("", None));
    }

    #[test]
    fn huge_digit_runs_are_plain_text() {
        let s = "dump99999999999999999999999999";
        assert_eq!(split_trailing_digits(s), (s, None));
    }

    #[test]
    fn fresh_name_still_gets_counter() {
        let td = tempdir().unwrap();
        let p = td.path().join("report.txt");
        let got = resolve_incremented(&p, PathPart::Name, "");
        assert_eq!(got, td.path().join("report1.txt"));
    }

    #[test]
    fn existing_suffix_resumes_after_it() {
        let td = tempdir().unwrap();
        let p = td.path().join("log7.txt");
        let got = resolve_incremented(&p, PathPart::Name, "");
        assert_eq!(got, td.path().join("log8.txt"));
    }

    #[test]
    fn counter_advances_by_original_value_plus_one() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("log8.txt"), b"x").unwrap();
        let got = resolve_incremented(&td.path().join("log7.txt"), PathPart::Name, "");
        // step is V+1 = 8, so 8 is skipped straight to 16
        assert_eq!(got, td.path().join("log16.txt"));
    }

    #[test]
    fn separator_is_inserted_between_part_and_counter() {
        let td = tempdir().unwrap();
        let got = resolve_incremented(&td.path().join("report.txt"), PathPart::Name, "_");
        assert_eq!(got, td.path().join("report_1.txt"));
    }

    #[test]
    fn missing_extension_becomes_bare_numeric() {
        let td = tempdir().unwrap();
        let got = resolve_incremented(&td.path().join("T"), PathPart::Extension, "");
        assert_eq!(got, td.path().join("T.1"));
    }

    #[test]
    fn extension_suffix_increments() {
        let td = tempdir().unwrap();
        let got = resolve_incremented(&td.path().join("data.v2"), PathPart::Extension, "");
        assert_eq!(got, td.path().join("data.v3"));
    }

    #[test]
    fn all_digit_stem_drops_separator() {
        let td = tempdir().unwrap();
        let got = resolve_incremented(&td.path().join("42.txt"), PathPart::Name, "_");
        assert_eq!(got, td.path().join("43.txt"));
    }

    #[test]
    fn folder_counter_on_whole_name() {
        let td = tempdir().unwrap();
        let got = resolve_incremented_folder(&td.path().join("build"), "");
        assert_eq!(got, td.path().join("build1"));
        fs::create_dir(td.path().join("build1")).unwrap();
        let got = resolve_incremented_folder(&td.path().join("build"), "");
        assert_eq!(got, td.path().join("build2"));
    }
}
