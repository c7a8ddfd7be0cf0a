//! Stream acquisition.
//!
//! Produces an open, correctly positioned stream for a path and a
//! [`FileOption`], performing whatever directory/file preparation the option
//! implies. The returned stream always reports the *actual* path used, which
//! differs from the requested path under the two increment policies.
//!
//! Per-option behavior:
//!
//! | option                | preparation                   | open            | seek  |
//! |-----------------------|-------------------------------|-----------------|-------|
//! | ReadOnly              | none (missing file is an error) | read            | none  |
//! | Append                | ensure parent dir             | open-or-create  | end   |
//! | Overwrite             | ensure parent dir             | truncate-or-create | start |
//! | IncrementFileName     | resolve name, ensure parent   | create-new      | start |
//! | IncrementFileExtension| resolve extension, ensure parent | create-new   | start |
//! | DoNothingIfExist      | existing: none; missing: ensure parent | read-write / create-new | start / end |

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncSeekExt;
use tracing::debug;

use crate::errors::{FileKitError, Result};
use crate::ioerr::classify;
use crate::options::FileOption;
use crate::resolve::{PathPart, resolve_incremented};
use crate::utils::ensure_parent_dir;

/// Default buffer size for chunked transfers; also the granularity at which
/// progress is reported and cancellation is checked.
pub const CHUNK_SIZE: usize = 4096;

/// An open byte stream plus the resolved path it was opened against.
/// Exclusively owned by the caller; closing (dropping) flushes the handle.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    path: PathBuf,
}

impl FileStream {
    /// The path actually used, post increment resolution.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_parts(self) -> (File, PathBuf) {
        (self.file, self.path)
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

/// Tokio-backed counterpart of [`FileStream`].
#[derive(Debug)]
pub struct AsyncFileStream {
    file: tokio::fs::File,
    path: PathBuf,
}

impl AsyncFileStream {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_parts(self) -> (tokio::fs::File, PathBuf) {
        (self.file, self.path)
    }

    pub fn file_mut(&mut self) -> &mut tokio::fs::File {
        &mut self.file
    }
}

/// Compute the effective target path for an option without opening anything.
/// Increment policies resolve to a fresh candidate; everything else keeps the
/// requested path.
pub(crate) fn effective_target(path: &Path, option: FileOption, separator: &str) -> PathBuf {
    match option {
        FileOption::IncrementFileNameIfExist => {
            resolve_incremented(path, PathPart::Name, separator)
        }
        FileOption::IncrementFileExtensionIfExist => {
            resolve_incremented(path, PathPart::Extension, separator)
        }
        _ => path.to_path_buf(),
    }
}

fn reject_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(FileKitError::AlreadyExistsAsFolder(path.to_path_buf()));
    }
    Ok(())
}

/// Open a stream at `path` under `option` (empty increment separator).
pub fn acquire(path: &Path, option: FileOption) -> Result<FileStream> {
    acquire_with_separator(path, option, "")
}

/// Open a stream at `path` under `option`, using `separator` between the
/// incremented part and its counter.
pub fn acquire_with_separator(
    path: &Path,
    option: FileOption,
    separator: &str,
) -> Result<FileStream> {
    let target = effective_target(path, option, separator);
    reject_directory(&target)?;

    let (file, seek_end) = match option {
        FileOption::ReadOnly => {
            if !target.exists() {
                return Err(FileKitError::NotFound(target));
            }
            let file = File::open(&target).map_err(classify("open file read-only", &target))?;
            (file, false)
        }
        FileOption::Append => {
            ensure_parent_dir(&target)?;
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .open(&target)
                .map_err(classify("open file for append", &target))?;
            (file, true)
        }
        FileOption::Overwrite => {
            ensure_parent_dir(&target)?;
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&target)
                .map_err(classify("open file truncated", &target))?;
            (file, false)
        }
        FileOption::IncrementFileNameIfExist | FileOption::IncrementFileExtensionIfExist => {
            ensure_parent_dir(&target)?;
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .map_err(classify("create incremented file", &target))?;
            (file, false)
        }
        FileOption::DoNothingIfExist => {
            if target.exists() {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(&target)
                    .map_err(classify("open existing file", &target))?;
                (file, false)
            } else {
                ensure_parent_dir(&target)?;
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create_new(true)
                    .open(&target)
                    .map_err(classify("create file", &target))?;
                (file, true)
            }
        }
    };

    let mut stream = FileStream { file, path: target };
    if seek_end {
        stream.seek(SeekFrom::End(0))?;
    } else if option != FileOption::ReadOnly {
        stream.seek(SeekFrom::Start(0))?;
    }
    debug!(path = %stream.path.display(), option = %option, "acquired stream");
    Ok(stream)
}

/// Async counterpart of [`acquire_with_separator`]. Identical path resolution
/// and option-branch semantics; only the I/O suspends instead of blocking.
pub async fn acquire_async(
    path: &Path,
    option: FileOption,
    separator: &str,
) -> Result<AsyncFileStream> {
    let target = effective_target(path, option, separator);
    reject_directory(&target)?;

    let (file, seek_end) = match option {
        FileOption::ReadOnly => {
            if !target.exists() {
                return Err(FileKitError::NotFound(target));
            }
            let file = tokio::fs::File::open(&target)
                .await
                .map_err(classify("open file read-only", &target))?;
            (file, false)
        }
        FileOption::Append => {
            ensure_parent_dir(&target)?;
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .open(&target)
                .await
                .map_err(classify("open file for append", &target))?;
            (file, true)
        }
        FileOption::Overwrite => {
            ensure_parent_dir(&target)?;
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&target)
                .await
                .map_err(classify("open file truncated", &target))?;
            (file, false)
        }
        FileOption::IncrementFileNameIfExist | FileOption::IncrementFileExtensionIfExist => {
            ensure_parent_dir(&target)?;
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
                .map_err(classify("create incremented file", &target))?;
            (file, false)
        }
        FileOption::DoNothingIfExist => {
            if target.exists() {
                let file = tokio::fs::OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(&target)
                    .await
                    .map_err(classify("open existing file", &target))?;
                (file, false)
            } else {
                ensure_parent_dir(&target)?;
                let file = tokio::fs::OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create_new(true)
                    .open(&target)
                    .await
                    .map_err(classify("create file", &target))?;
                (file, true)
            }
        }
    };

    let mut stream = AsyncFileStream { file, path: target };
    if seek_end {
        stream.file.seek(SeekFrom::End(0)).await?;
    } else if option != FileOption::ReadOnly {
        stream.file.seek(SeekFrom::Start(0)).await?;
    }
    Ok(stream)
}
