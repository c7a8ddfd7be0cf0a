//! Conflict-resolution policies selected per call.
//!
//! A policy decides what to do when the target of a write/copy/move already
//! exists. File and folder policies mirror each other at their respective
//! granularities.

use std::fmt;
use std::str::FromStr;

/// What to do when the target file of an operation already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOption {
    /// Open (or create) the file and position the stream at the end.
    Append,
    /// Truncate (or create) the file and write from the start.
    Overwrite,
    /// Leave an existing file untouched; create it only when missing.
    DoNothingIfExist,
    /// Pick a collision-free name by appending a numeric suffix to the stem.
    IncrementFileNameIfExist,
    /// Pick a collision-free name by appending a numeric suffix to the extension.
    IncrementFileExtensionIfExist,
    /// Read contract: open an existing file for reading only.
    ReadOnly,
}

/// What to do when the target folder of an operation already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderOption {
    /// Pick a collision-free directory name by appending a numeric suffix.
    IncrementFolderNameIfExist,
    /// Replace the existing directory.
    Overwrite,
    /// Leave an existing directory untouched.
    DoNothingIfExist,
}

impl FileOption {
    /// Parse common string names (case-insensitive); used by the CLI.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "append" => Some(FileOption::Append),
            "overwrite" => Some(FileOption::Overwrite),
            "do-nothing" | "donothing" | "skip" => Some(FileOption::DoNothingIfExist),
            "increment-name" | "increment" => Some(FileOption::IncrementFileNameIfExist),
            "increment-extension" | "increment-ext" => {
                Some(FileOption::IncrementFileExtensionIfExist)
            }
            "read-only" | "readonly" => Some(FileOption::ReadOnly),
            _ => None,
        }
    }
}

impl fmt::Display for FileOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileOption::Append => "append",
            FileOption::Overwrite => "overwrite",
            FileOption::DoNothingIfExist => "do-nothing",
            FileOption::IncrementFileNameIfExist => "increment-name",
            FileOption::IncrementFileExtensionIfExist => "increment-extension",
            FileOption::ReadOnly => "read-only",
        };
        f.write_str(s)
    }
}

impl FromStr for FileOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileOption::parse(s).ok_or_else(|| format!("unknown file option '{s}'"))
    }
}

impl FolderOption {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "increment-name" | "increment" => Some(FolderOption::IncrementFolderNameIfExist),
            "overwrite" => Some(FolderOption::Overwrite),
            "do-nothing" | "donothing" | "skip" => Some(FolderOption::DoNothingIfExist),
            _ => None,
        }
    }
}

impl fmt::Display for FolderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FolderOption::IncrementFolderNameIfExist => "increment-name",
            FolderOption::Overwrite => "overwrite",
            FolderOption::DoNothingIfExist => "do-nothing",
        };
        f.write_str(s)
    }
}

impl FromStr for FolderOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FolderOption::parse(s).ok_or_else(|| format!("unknown folder option '{s}'"))
    }
}
