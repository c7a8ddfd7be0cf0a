//! Typed error definitions for filekit.
//! Provides a small set of well-known failure modes for better logs and tests.
//!
//! Propagation policy: path-validation problems surface as `InvalidArgument`
//! before any I/O side effect; permission failures are surfaced, never
//! recovered; plain I/O errors pass through unmodified.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileKitError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("a folder already exists at {0}")]
    AlreadyExistsAsFolder(PathBuf),

    #[error("permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("operation interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FileKitError>;
