//! Write operations.
//!
//! All writers return the path actually written to, which differs from the
//! handle's path when an increment policy was applied. `DoNothingIfExist`
//! short-circuits before any stream is opened.

use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::errors::Result;
use crate::options::FileOption;
use crate::stream::{CHUNK_SIZE, acquire_with_separator};

use super::FileHandle;

impl FileHandle {
    /// Write UTF-8 text under `option`.
    pub fn write_str(&self, content: &str, option: FileOption) -> Result<PathBuf> {
        self.write_bytes(content.as_bytes(), option)
    }

    /// Write a byte slice under `option`.
    pub fn write_bytes(&self, bytes: &[u8], option: FileOption) -> Result<PathBuf> {
        self.write_reader_with(bytes, option, "", None)
    }

    /// Stream `reader` into the target under `option`.
    pub fn write_reader<R: Read>(&self, reader: R, option: FileOption) -> Result<PathBuf> {
        self.write_reader_with(reader, option, "", None)
    }

    /// Stream `reader` into the target, with a configurable increment
    /// separator and an optional cumulative-bytes progress callback.
    pub fn write_reader_with<R: Read>(
        &self,
        mut reader: R,
        option: FileOption,
        separator: &str,
        mut progress: Option<&mut dyn FnMut(u64)>,
    ) -> Result<PathBuf> {
        // Avoid the cost of opening a stream at all when the policy says to
        // leave an existing file alone.
        if option == FileOption::DoNothingIfExist && self.exists() {
            debug!(path = %self.path().display(), "target exists; leaving untouched");
            return Ok(self.path().to_path_buf());
        }

        let mut stream = acquire_with_separator(self.path(), option, separator)?;
        let mut buf = [0u8; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = reader.read(&mut buf)?;
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
        debug!(path = %stream.path().display(), bytes = total, "wrote file");
        Ok(stream.into_parts().1)
    }
}
