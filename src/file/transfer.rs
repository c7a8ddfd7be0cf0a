//! Copy, move and extension-change operations.
//!
//! Copy never mutates the source. Move attempts the platform's atomic rename
//! for `Overwrite` and falls back to copy-then-delete on cross-filesystem
//! errors; every other option is implemented as copy-then-delete so the copy
//! semantics are inherited.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{FileKitError, Result};
use crate::ioerr::classify;
use crate::options::FileOption;
use crate::stream::{CHUNK_SIZE, acquire_with_separator};
use crate::utils::{canonical_or_self, ensure_parent_dir, validate_path};

use super::FileHandle;

impl FileHandle {
    /// Copy the file to `dest` under `option`. Returns the path actually
    /// written to (post increment resolution). The source is never modified.
    pub fn copy_to(&self, dest: &Path, option: FileOption) -> Result<PathBuf> {
        self.copy_to_with(dest, option, "", None)
    }

    /// Copy with a configurable increment separator and an optional
    /// cumulative-bytes progress callback.
    pub fn copy_to_with(
        &self,
        dest: &Path,
        option: FileOption,
        separator: &str,
        mut progress: Option<&mut dyn FnMut(u64)>,
    ) -> Result<PathBuf> {
        validate_path(dest)?;
        if option == FileOption::ReadOnly {
            return Err(FileKitError::InvalidArgument(
                "read-only is not a valid policy for a copy destination".into(),
            ));
        }
        if !self.exists() {
            return Err(FileKitError::NotFound(self.path().to_path_buf()));
        }
        if option == FileOption::DoNothingIfExist && dest.exists() {
            debug!(dest = %dest.display(), "destination exists; copy skipped");
            return Ok(dest.to_path_buf());
        }
        // Opening the source and then truncating/appending the same path
        // would destroy the data being copied.
        if !matches!(
            option,
            FileOption::IncrementFileNameIfExist | FileOption::IncrementFileExtensionIfExist
        ) && canonical_or_self(self.path()) == canonical_or_self(dest)
        {
            debug!(path = %dest.display(), "source and destination are the same file; copy skipped");
            return Ok(dest.to_path_buf());
        }

        let mut src = fs::File::open(self.path()).map_err(classify("open source", self.path()))?;
        let mut stream = acquire_with_separator(dest, option, separator)?;

        let mut buf = [0u8; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = src.read(&mut buf)?;
            if n == 0 {
                break;
            }
            stream.write_all(&buf[..n])?;
            total += n as u64;
            if let Some(cb) = progress.as_mut() {
                cb(total);
            }
        }
        stream.flush()?;
        debug!(src = %self.path().display(), dest = %stream.path().display(), bytes = total, "copied file");
        Ok(stream.into_parts().1)
    }

    /// Move the file to `dest` under `option`. On success the handle's
    /// identity follows the file to its new path.
    ///
    /// Moving a path onto itself is a successful no-op; `ReadOnly` is a
    /// pass-through no-op that leaves the source in place.
    pub fn move_to(&mut self, dest: &Path, option: FileOption) -> Result<PathBuf> {
        self.move_impl(dest, option, "").map(|(path, _)| path)
    }

    /// Swap the extension and move the file accordingly. Returns whether the
    /// file actually ended up at the new path (policy no-ops return `false`).
    pub fn change_extension(&mut self, new_ext: &str, option: FileOption) -> Result<bool> {
        let new_path = self.path().with_extension(new_ext.trim_start_matches('.'));
        self.move_impl(&new_path, option, "").map(|(_, moved)| moved)
    }

    fn move_impl(
        &mut self,
        dest: &Path,
        option: FileOption,
        separator: &str,
    ) -> Result<(PathBuf, bool)> {
        validate_path(dest)?;

        if canonical_or_self(self.path()) == canonical_or_self(dest) {
            return Ok((self.path().to_path_buf(), true));
        }
        if !self.exists() {
            return Err(FileKitError::NotFound(self.path().to_path_buf()));
        }

        match option {
            FileOption::ReadOnly => Ok((self.path().to_path_buf(), false)),
            FileOption::Overwrite => {
                ensure_parent_dir(dest)?;
                if let Err(e) = fs::rename(self.path(), dest) {
                    warn!(error = %e, src = %self.path().display(), dest = %dest.display(),
                        "atomic rename failed, falling back to copy+remove");
                    fs::copy(self.path(), dest).map_err(classify("copy file", dest))?;
                    fs::remove_file(self.path())
                        .map_err(classify("remove original file", self.path()))?;
                } else {
                    debug!(src = %self.path().display(), dest = %dest.display(), "renamed file atomically");
                }
                self.set_path(dest.to_path_buf());
                Ok((dest.to_path_buf(), true))
            }
            FileOption::DoNothingIfExist if dest.exists() => {
                // Copy would be skipped; deleting the source here would lose
                // data, so the move degrades to a no-op as well.
                Ok((dest.to_path_buf(), false))
            }
            _ => {
                let actual = self.copy_to_with(dest, option, separator, None)?;
                fs::remove_file(self.path())
                    .map_err(classify("remove original file", self.path()))?;
                self.set_path(actual.clone());
                Ok((actual, true))
            }
        }
    }
}
