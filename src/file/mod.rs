//! File handles.
//!
//! A [`FileHandle`] is an in-memory reference to a filesystem path, distinct
//! from the underlying file itself. Existence and name parts are derived on
//! demand; nothing is cached across operations that might have changed the
//! backing file. The handle never renames itself in place: path-changing
//! operations (`move_to`, `change_extension`) update the identity only after
//! the underlying filesystem move succeeded.
//!
//! Operations are explicitly *not* safe for concurrent invocation on the same
//! handle; callers must serialize writes to a single path themselves.

mod async_ops;
mod transfer;
mod write;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{FileKitError, Result};
use crate::ioerr::classify;
use crate::platform::clear_protective_attributes;
use crate::utils::{ensure_parent_dir, validate_path};

/// Outcome of [`FileHandle::create_or_truncate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The file already existed and was left untouched.
    AlreadyExisted,
    /// The file was created, or truncated to zero length.
    Created,
}

/// Reference to a file path with policy-driven operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    /// Create a handle. Path syntax is validated here, before any I/O.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self { path })
    }

    /// The path this handle identifies.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file currently exists. Queried fresh on every call.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// The containing directory, if the path has one.
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// The final path component.
    pub fn name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// The filename without its (last) extension.
    pub fn name_without_extension(&self) -> Option<&OsStr> {
        self.path.file_stem()
    }

    /// The extension, without the leading dot.
    pub fn extension(&self) -> Option<&OsStr> {
        self.path.extension()
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    /// Read the whole file as UTF-8 text. Missing file is `NotFound`.
    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(classify("read file", &self.path))
    }

    /// Read the whole file as bytes. Missing file is `NotFound`.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(classify("read file", &self.path))
    }

    /// Delete the backing file. Read-only attributes are cleared first
    /// (best-effort) so deletion doesn't fail against common OS protections.
    /// Deleting a non-existent file is not an error.
    pub fn delete(&self) -> Result<()> {
        clear_protective_attributes(&self.path);
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(classify("delete file", &self.path)(e)),
        }
    }

    /// Create a zero-length file, or truncate an existing one when `truncate`
    /// is set. With `truncate = false` an existing file is left untouched.
    pub fn create_or_truncate(&self, truncate: bool) -> Result<CreateOutcome> {
        if !truncate && self.path.exists() {
            return Ok(CreateOutcome::AlreadyExisted);
        }
        if self.path.is_dir() {
            return Err(FileKitError::AlreadyExistsAsFolder(self.path.clone()));
        }
        ensure_parent_dir(&self.path)?;
        fs::File::create(&self.path).map_err(classify("create file", &self.path))?;
        Ok(CreateOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn derived_name_parts() {
        let h = FileHandle::new("/data/report.final.txt").unwrap();
        assert_eq!(h.name(), Some(OsStr::new("report.final.txt")));
        assert_eq!(h.name_without_extension(), Some(OsStr::new("report.final")));
        assert_eq!(h.extension(), Some(OsStr::new("txt")));
        assert_eq!(h.directory(), Some(Path::new("/data")));
    }

    #[test]
    fn empty_path_rejected_at_construction() {
        let err = FileHandle::new("").unwrap_err();
        assert!(matches!(err, FileKitError::InvalidArgument(_)));
    }

    #[test]
    fn exists_is_not_cached() {
        let td = tempdir().unwrap();
        let h = FileHandle::new(td.path().join("f.txt")).unwrap();
        assert!(!h.exists());
        fs::write(h.path(), b"x").unwrap();
        assert!(h.exists());
        fs::remove_file(h.path()).unwrap();
        assert!(!h.exists());
    }

    #[test]
    fn create_or_truncate_outcomes() {
        let td = tempdir().unwrap();
        let h = FileHandle::new(td.path().join("c.bin")).unwrap();

        assert_eq!(h.create_or_truncate(false).unwrap(), CreateOutcome::Created);
        fs::write(h.path(), b"payload").unwrap();
        assert_eq!(
            h.create_or_truncate(false).unwrap(),
            CreateOutcome::AlreadyExisted
        );
        assert_eq!(fs::read(h.path()).unwrap(), b"payload");

        assert_eq!(h.create_or_truncate(true).unwrap(), CreateOutcome::Created);
        assert_eq!(fs::metadata(h.path()).unwrap().len(), 0);
    }
}
