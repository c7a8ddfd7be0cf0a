//! Asynchronous variants of the file operations.
//!
//! Path resolution and option-branch semantics are identical to the blocking
//! counterparts; only the I/O suspends the caller instead of blocking the
//! thread. A [`CancelFlag`] is checked at each chunk boundary; cancellation
//! mid-transfer yields `Interrupted` and leaves the destination partially
//! written; callers needing atomicity should write to a temporary path and
//! rename on success.

use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::cancel::CancelFlag;
use crate::errors::{FileKitError, Result};
use crate::ioerr::classify;
use crate::options::FileOption;
use crate::platform::clear_protective_attributes;
use crate::stream::{CHUNK_SIZE, acquire_async};
use crate::utils::{canonical_or_self, ensure_parent_dir, validate_path};

use super::FileHandle;

/// Chunked transfer loop shared by the async writers and copiers.
async fn pump<R, W>(
    reader: &mut R,
    writer: &mut W,
    cancel: Option<&CancelFlag>,
    mut progress: Option<&mut (dyn FnMut(u64) + Send)>,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        if let Some(flag) = cancel
            && flag.is_cancelled()
        {
            return Err(FileKitError::Interrupted);
        }
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        total += n as u64;
        if let Some(cb) = progress.as_mut() {
            cb(total);
        }
    }
    writer.flush().await?;
    Ok(total)
}

impl FileHandle {
    /// Async counterpart of [`FileHandle::read_bytes`].
    pub async fn read_bytes_async(&self) -> Result<Vec<u8>> {
        tokio::fs::read(self.path())
            .await
            .map_err(classify("read file", self.path()))
    }

    /// Async counterpart of [`FileHandle::read_to_string`].
    pub async fn read_to_string_async(&self) -> Result<String> {
        tokio::fs::read_to_string(self.path())
            .await
            .map_err(classify("read file", self.path()))
    }

    /// Async counterpart of [`FileHandle::write_str`].
    pub async fn write_str_async(&self, content: &str, option: FileOption) -> Result<PathBuf> {
        self.write_bytes_async(content.as_bytes(), option, None, None)
            .await
    }

    /// Async counterpart of [`FileHandle::write_bytes`], with optional
    /// cancellation and progress reporting.
    pub async fn write_bytes_async(
        &self,
        bytes: &[u8],
        option: FileOption,
        cancel: Option<&CancelFlag>,
        progress: Option<&mut (dyn FnMut(u64) + Send)>,
    ) -> Result<PathBuf> {
        self.write_reader_async(bytes, option, cancel, progress)
            .await
    }

    /// Stream an async reader into the target under `option`.
    pub async fn write_reader_async<R>(
        &self,
        mut reader: R,
        option: FileOption,
        cancel: Option<&CancelFlag>,
        progress: Option<&mut (dyn FnMut(u64) + Send)>,
    ) -> Result<PathBuf>
    where
        R: AsyncRead + Unpin,
    {
        if option == FileOption::DoNothingIfExist && self.exists() {
            debug!(path = %self.path().display(), "target exists; leaving untouched");
            return Ok(self.path().to_path_buf());
        }

        let mut stream = acquire_async(self.path(), option, "").await?;
        let total = pump(&mut reader, stream.file_mut(), cancel, progress).await?;
        debug!(path = %stream.path().display(), bytes = total, "wrote file");
        Ok(stream.into_parts().1)
    }

    /// Async counterpart of [`FileHandle::copy_to`].
    pub async fn copy_to_async(
        &self,
        dest: &Path,
        option: FileOption,
        cancel: Option<&CancelFlag>,
        progress: Option<&mut (dyn FnMut(u64) + Send)>,
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
            return Ok(dest.to_path_buf());
        }
        // Opening the source and then truncating/appending the same path
        // would destroy the data being copied.
        if !matches!(
            option,
            FileOption::IncrementFileNameIfExist | FileOption::IncrementFileExtensionIfExist
        ) && canonical_or_self(self.path()) == canonical_or_self(dest)
        {
            return Ok(dest.to_path_buf());
        }

        let mut src = tokio::fs::File::open(self.path())
            .await
            .map_err(classify("open source", self.path()))?;
        let mut stream = acquire_async(dest, option, "").await?;
        let total = pump(&mut src, stream.file_mut(), cancel, progress).await?;
        debug!(src = %self.path().display(), dest = %stream.path().display(), bytes = total, "copied file");
        Ok(stream.into_parts().1)
    }

    /// Async counterpart of [`FileHandle::move_to`].
    pub async fn move_to_async(
        &mut self,
        dest: &Path,
        option: FileOption,
        cancel: Option<&CancelFlag>,
    ) -> Result<PathBuf> {
        self.move_impl_async(dest, option, cancel)
            .await
            .map(|(path, _)| path)
    }

    /// Async counterpart of [`FileHandle::change_extension`].
    pub async fn change_extension_async(
        &mut self,
        new_ext: &str,
        option: FileOption,
        cancel: Option<&CancelFlag>,
    ) -> Result<bool> {
        let new_path = self.path().with_extension(new_ext.trim_start_matches('.'));
        self.move_impl_async(&new_path, option, cancel)
            .await
            .map(|(_, moved)| moved)
    }

    /// Async counterpart of [`FileHandle::delete`]. Same contract: attributes
    /// cleared best-effort first, deleting a missing file is not an error.
    pub async fn delete_async(&self) -> Result<()> {
        clear_protective_attributes(self.path());
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => {
                debug!(path = %self.path().display(), "deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(classify("delete file", self.path())(e)),
        }
    }

    async fn move_impl_async(
        &mut self,
        dest: &Path,
        option: FileOption,
        cancel: Option<&CancelFlag>,
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
                if let Err(e) = tokio::fs::rename(self.path(), dest).await {
                    warn!(error = %e, src = %self.path().display(), dest = %dest.display(),
                        "atomic rename failed, falling back to copy+remove");
                    self.copy_to_async(dest, FileOption::Overwrite, cancel, None)
                        .await?;
                    tokio::fs::remove_file(self.path())
                        .await
                        .map_err(classify("remove original file", self.path()))?;
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
                let actual = self.copy_to_async(dest, option, cancel, None).await?;
                tokio::fs::remove_file(self.path())
                    .await
                    .map_err(classify("remove original file", self.path()))?;
                self.set_path(actual.clone());
                Ok((actual, true))
            }
        }
    }
}
