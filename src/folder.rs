//! Folder handles.
//!
//! Directory-level analogs of the file operations: create/copy/move/delete at
//! [`FolderOption`] granularity, enumeration, change watching, and zip
//! packing through the archive collaborator. Copy and move recurse into the
//! per-file operations; per-file copies run in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::{FileKitError, Result};
use crate::file::FileHandle;
use crate::ioerr::classify;
use crate::options::FolderOption;
use crate::platform::clear_protective_attributes;
use crate::resolve::resolve_incremented_folder;
use crate::utils::{canonical_or_self, validate_path};
use crate::watch::{WatchEvent, WatcherHandle, watch_path};

#[cfg(feature = "archive")]
use crate::archive::{Archive, Compression};
#[cfg(feature = "archive")]
use crate::options::FileOption;

/// Reference to a directory path with policy-driven operations.
///
/// At most one watcher is active per handle; starting a second replaces the
/// first.
#[derive(Debug)]
pub struct FolderHandle {
    path: PathBuf,
    watcher: Option<WatcherHandle>,
}

impl FolderHandle {
    /// Create a handle. Path syntax is validated here, before any I/O.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self {
            path,
            watcher: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing directory currently exists. Queried fresh.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    pub fn name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }

    /// Create the directory under `option`. Returns the path actually
    /// created, which differs from the handle's path under the increment
    /// policy (the candidate always carries a counter).
    pub fn create(&self, option: FolderOption) -> Result<PathBuf> {
        let target = match option {
            FolderOption::IncrementFolderNameIfExist => resolve_incremented_folder(&self.path, ""),
            FolderOption::Overwrite => {
                if self.path.exists() {
                    fs::remove_dir_all(&self.path)
                        .map_err(classify("remove existing directory", &self.path))?;
                }
                self.path.clone()
            }
            FolderOption::DoNothingIfExist => {
                if self.path.is_dir() {
                    return Ok(self.path.clone());
                }
                self.path.clone()
            }
        };
        fs::create_dir_all(&target).map_err(classify("create directory", &target))?;
        debug!(path = %target.display(), "created directory");
        Ok(target)
    }

    /// Recursively delete the directory. Protective attributes are cleared
    /// first (best-effort); deleting a non-existent directory is not an error.
    pub fn delete(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        for entry in WalkDir::new(&self.path).into_iter().filter_map(|e| e.ok()) {
            clear_protective_attributes(entry.path());
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "deleted directory");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(classify("delete directory", &self.path)(e)),
        }
    }

    /// Enumerate contained files as handles, optionally recursing.
    pub fn files(&self, recursive: bool) -> Result<Vec<FileHandle>> {
        if !self.exists() {
            return Err(FileKitError::NotFound(self.path.clone()));
        }
        let walker = if recursive {
            WalkDir::new(&self.path)
        } else {
            WalkDir::new(&self.path).max_depth(1)
        };
        walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| FileHandle::new(e.into_path()))
            .collect()
    }

    /// Enumerate immediate subdirectories as handles.
    pub fn folders(&self) -> Result<Vec<FolderHandle>> {
        if !self.exists() {
            return Err(FileKitError::NotFound(self.path.clone()));
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(classify("read directory", &self.path))? {
            let entry = entry.map_err(classify("read directory", &self.path))?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                out.push(FolderHandle::new(entry.path())?);
            }
        }
        Ok(out)
    }

    /// Copy the directory tree to `dest` under `option`. Returns the path
    /// actually written. The source is never modified; file timestamps are
    /// preserved best-effort.
    pub fn copy_to(&self, dest: &Path, option: FolderOption) -> Result<PathBuf> {
        validate_path(dest)?;
        if !self.exists() {
            return Err(FileKitError::NotFound(self.path.clone()));
        }

        let target = match option {
            FolderOption::DoNothingIfExist if dest.exists() => {
                debug!(dest = %dest.display(), "destination exists; copy skipped");
                return Ok(dest.to_path_buf());
            }
            FolderOption::IncrementFolderNameIfExist => resolve_incremented_folder(dest, ""),
            _ => dest.to_path_buf(),
        };

        // A target inside the source would be rediscovered by the walk below
        // and nest without bound.
        if target.starts_with(&self.path)
            || canonical_or_self(&target).starts_with(canonical_or_self(&self.path))
        {
            return Err(FileKitError::InvalidArgument(format!(
                "cannot copy '{}' into its own subtree '{}'",
                self.path.display(),
                target.display()
            )));
        }

        // Materialize the directory tree first so parallel file copies never
        // race on parent creation.
        fs::create_dir_all(&target).map_err(classify("create directory", &target))?;
        for entry in WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
        {
            if let Ok(rel) = entry.path().strip_prefix(&self.path) {
                fs::create_dir_all(target.join(rel))
                    .map_err(classify("create directory", &target))?;
            }
        }

        let files: Vec<PathBuf> = WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        // Borrow only the path; the handle itself (with its watcher channel)
        // must not cross into the worker threads.
        let src_root = self.path.as_path();
        files.par_iter().try_for_each(|src| -> Result<()> {
            let rel = src
                .strip_prefix(src_root)
                .map_err(|_| FileKitError::InvalidArgument(format!(
                    "'{}' is outside the source tree",
                    src.display()
                )))?;
            let dst = target.join(rel);
            fs::copy(src, &dst).map_err(classify("copy file", &dst))?;
            if let Ok(meta) = fs::metadata(src) {
                if let Ok(mtime) = meta.modified() {
                    let ft = filetime::FileTime::from_system_time(mtime);
                    if let Err(e) = filetime::set_file_mtime(&dst, ft) {
                        warn!(path = %dst.display(), error = %e, "failed to preserve mtime");
                    }
                }
            }
            Ok(())
        })?;

        info!(src = %self.path.display(), dest = %target.display(), files = files.len(), "copied directory");
        Ok(target)
    }

    /// Move the directory to `dest` under `option`. Attempts a fast rename
    /// (same filesystem) before copying contents and removing the source. On
    /// success the handle's identity follows the directory.
    pub fn move_to(&mut self, dest: &Path, option: FolderOption) -> Result<PathBuf> {
        validate_path(dest)?;
        if canonical_or_self(&self.path) == canonical_or_self(dest) {
            return Ok(self.path.clone());
        }
        if !self.exists() {
            return Err(FileKitError::NotFound(self.path.clone()));
        }

        let target = match option {
            FolderOption::DoNothingIfExist if dest.exists() => {
                return Ok(dest.to_path_buf());
            }
            FolderOption::IncrementFolderNameIfExist => resolve_incremented_folder(dest, ""),
            FolderOption::Overwrite if dest.exists() => {
                fs::remove_dir_all(dest).map_err(classify("remove existing directory", dest))?;
                dest.to_path_buf()
            }
            _ => dest.to_path_buf(),
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(classify("create parent directory", parent))?;
        }
        if fs::rename(&self.path, &target).is_ok() {
            info!(src = %self.path.display(), dest = %target.display(), "renamed directory atomically");
            self.path = target.clone();
            return Ok(target);
        }

        let copied = self.copy_to(&target, FolderOption::Overwrite)?;
        // Same cleanup path as delete() so read-only content in the source
        // cannot strand a half-finished move.
        self.delete()?;
        info!(src = %self.path.display(), dest = %copied.display(), "copied directory contents and removed source");
        self.path = copied.clone();
        Ok(copied)
    }

    /// Start watching this directory. A previously started watcher on this
    /// handle is replaced, not stacked.
    pub fn watch(&mut self, recursive: bool) -> Result<()> {
        self.watcher = Some(watch_path(&self.path, recursive)?);
        Ok(())
    }

    /// Stop the active watcher, if any.
    pub fn unwatch(&mut self) {
        if let Some(w) = self.watcher.take() {
            w.stop();
        }
    }

    /// Whether a watcher is currently active on this handle.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Pop a pending change event without blocking.
    pub fn try_event(&self) -> Option<WatchEvent> {
        self.watcher.as_ref()?.try_event()
    }

    /// Block up to `timeout` for the next change. `None` means no watcher is
    /// active or the timeout elapsed without a change.
    pub fn wait_for_change(&self, timeout: std::time::Duration) -> Option<WatchEvent> {
        self.watcher.as_ref()?.wait(timeout)
    }

    /// Pack the directory tree into a zip file at `dest` under `option`.
    /// Only `Overwrite`, `DoNothingIfExist` and the increment policies make
    /// sense for a container; `Append`/`ReadOnly` are invalid arguments.
    #[cfg(feature = "archive")]
    pub fn zip_to(
        &self,
        dest: &Path,
        option: FileOption,
        compression: Compression,
    ) -> Result<PathBuf> {
        validate_path(dest)?;
        if matches!(option, FileOption::Append | FileOption::ReadOnly) {
            return Err(FileKitError::InvalidArgument(format!(
                "'{option}' is not a valid policy for packing an archive"
            )));
        }
        if option == FileOption::DoNothingIfExist && dest.exists() {
            return Ok(dest.to_path_buf());
        }

        let target = crate::stream::effective_target(dest, option, "");
        Archive::from_directory(&self.path)?.save_to_path(&target, compression)?;
        Ok(target)
    }

    /// Unpack a zip file into this directory (created when missing).
    #[cfg(feature = "archive")]
    pub fn unzip_from(&self, archive: &Path) -> Result<()> {
        fs::create_dir_all(&self.path).map_err(classify("create directory", &self.path))?;
        Archive::open(archive)?.extract_to(&self.path)
    }
}
