//! CLI definition and parsing.
//! Defines the command tree and provides `parse()` for command-line handling.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use filekit::{FileOption, FolderOption};

/// Program-defined verbosity levels exposed to users.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

/// CLI wrapper for the filekit library.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Policy-driven file and folder operations")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write text to a file under a conflict policy.
    Write {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        content: String,
        /// Policy when the target exists: append, overwrite, do-nothing,
        /// increment-name, increment-extension.
        #[arg(long, short = 'o', default_value = "overwrite")]
        option: FileOption,
    },
    /// Print a file's content.
    Read {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Copy a file under a conflict policy, reporting progress.
    Copy {
        #[arg(value_hint = ValueHint::FilePath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dest: PathBuf,
        #[arg(long, short = 'o', default_value = "overwrite")]
        option: FileOption,
    },
    /// Move a file under a conflict policy.
    Move {
        #[arg(value_hint = ValueHint::FilePath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dest: PathBuf,
        #[arg(long, short = 'o', default_value = "overwrite")]
        option: FileOption,
    },
    /// Delete a file (idempotent).
    Delete {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Copy a directory tree under a folder policy.
    CopyDir {
        #[arg(value_hint = ValueHint::DirPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dest: PathBuf,
        /// Policy when the target exists: overwrite, do-nothing, increment-name.
        #[arg(long, short = 'o', default_value = "overwrite")]
        option: FolderOption,
    },
    /// Pack a directory into a zip archive.
    #[cfg(feature = "archive")]
    Zip {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dest: PathBuf,
        /// Store entries uncompressed instead of DEFLATE.
        #[arg(long)]
        stored: bool,
        #[arg(long, short = 'o', default_value = "overwrite")]
        option: FileOption,
    },
    /// Unpack a zip archive into a directory.
    #[cfg(feature = "archive")]
    Unzip {
        #[arg(value_hint = ValueHint::FilePath)]
        archive: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dest: PathBuf,
    },
    /// Watch a directory and print change events until interrupted.
    Watch {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        /// Recurse into subdirectories.
        #[arg(long, short = 'r')]
        recursive: bool,
    },
    /// Print a file's size in human-readable form.
    Size {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > default.
    pub fn effective_log_level(&self) -> LogLevel {
        if self.debug {
            return LogLevel::Debug;
        }
        self.log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or_default()
    }
}

pub fn parse() -> Args {
    Args::parse()
}
