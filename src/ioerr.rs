//! I/O error classification helpers.
//!
//! Small adapters that turn a raw `io::Error` into a typed `FileKitError`
//! with actionable context/hints, usable with `map_err` at call sites:
//!
//!   fs::create_dir_all(dir).map_err(classify("create dir", dir))?;

use std::io;
use std::path::Path;

use crate::errors::FileKitError;

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EXDEV => {
                    msg.push_str("; cross-filesystem; atomic rename not possible.");
                }
                libc::EBUSY => {
                    msg.push_str("; resource busy; ensure no other process is writing.");
                }
                libc::ENOSPC => {
                    msg.push_str("; insufficient space on device.");
                }
                libc::EROFS => {
                    msg.push_str("; read-only filesystem; cannot write here.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str("; filename or path too long; shorten path segments.");
                }
                libc::ELOOP => {
                    msg.push_str("; too many symbolic link levels; possible symlink cycle.");
                }
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::AlreadyExists => {
                msg.push_str("; already exists; remove or choose a unique name.");
            }
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                msg.push_str("; busy/timed out; retry after the current write finishes.");
            }
            _ => {}
        }
    }

    msg
}

/// Adapter returning a closure suitable for `.map_err(...)`.
///
/// `NotFound` and `PermissionDenied` map to their dedicated variants; anything
/// else stays an I/O error with the enriched message and original kind.
pub(crate) fn classify<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FileKitError + 'a {
    move |e: io::Error| match e.kind() {
        io::ErrorKind::NotFound => FileKitError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => FileKitError::PermissionDenied {
            path: path.to_path_buf(),
            context: format!("{}: {}", op, e),
        },
        _ => FileKitError::Io(io::Error::new(e.kind(), build_message(op, path, &e))),
    }
}
