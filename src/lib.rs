//! Core library for `filekit`.
//!
//! Object-oriented wrappers around files, folders and zip containers with
//! options-based write semantics: given a target path and a "what to do if it
//! exists" policy, compute the final path, acquire a correctly positioned
//! stream, and perform the write/copy/move deterministically on every policy
//! branch. Callers always get back the path actually used, which may differ
//! from the requested one under the increment policies.
//!
//! The crate is a thin synchronous/asynchronous wrapper over the filesystem:
//! no retries, no internal locking, no persisted state. Two concurrent
//! writers to the same path are a data race at the filesystem level; calls
//! against different paths are independent.

#[cfg(feature = "archive")]
mod archive;
mod cancel;
mod errors;
mod file;
mod folder;
mod ioerr;
mod options;
pub mod output;
mod platform;
mod resolve;
mod stream;
pub mod utils;
mod watch;

#[cfg(feature = "archive")]
pub use archive::{Archive, ArchiveEntry, Compression};
pub use cancel::CancelFlag;
pub use errors::{FileKitError, Result};
pub use file::{CreateOutcome, FileHandle};
pub use folder::FolderHandle;
pub use options::{FileOption, FolderOption};
pub use resolve::{PathPart, resolve_incremented, resolve_incremented_folder};
pub use stream::{
    AsyncFileStream, CHUNK_SIZE, FileStream, acquire, acquire_async, acquire_with_separator,
};
pub use utils::{format_bytes, validate_path};
pub use watch::{WatchEvent, WatcherHandle, watch_path};
