//! Application orchestrator.
//! Initializes logging, installs the interrupt handler, and dispatches the
//! parsed command onto the library handles.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use filekit::output as out;
use filekit::{CancelFlag, FileHandle, FolderHandle, format_bytes};

#[cfg(feature = "archive")]
use filekit::Compression;

use crate::cli::{Args, Command};
use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    init_tracing(&args.effective_log_level(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.cancel();
            out::print_warn("Received interrupt; shutting down...");
        })
        .context("failed to install signal handler")?;
    }

    match args.command {
        Command::Write {
            path,
            content,
            option,
        } => {
            let handle = FileHandle::new(path)?;
            let used = handle.write_str(&content, option)?;
            out::print_user(&used.display().to_string());
        }
        Command::Read { path } => {
            let handle = FileHandle::new(path)?;
            out::print_user(&handle.read_to_string()?);
        }
        Command::Copy { src, dest, option } => {
            let handle = FileHandle::new(src)?;
            let mut last = 0u64;
            let mut progress = |total: u64| last = total;
            let used = handle.copy_to_with(&dest, option, "", Some(&mut progress))?;
            out::print_success(&format!(
                "copied {} -> {} ({})",
                handle.path().display(),
                used.display(),
                format_bytes(last)
            ));
        }
        Command::Move { src, dest, option } => {
            let mut handle = FileHandle::new(src)?;
            let used = handle.move_to(&dest, option)?;
            out::print_success(&format!("moved to {}", used.display()));
        }
        Command::Delete { path } => {
            FileHandle::new(path)?.delete()?;
            out::print_success("deleted");
        }
        Command::CopyDir { src, dest, option } => {
            let handle = FolderHandle::new(src)?;
            let used = handle.copy_to(&dest, option)?;
            out::print_success(&format!("copied directory to {}", used.display()));
        }
        #[cfg(feature = "archive")]
        Command::Zip {
            dir,
            dest,
            stored,
            option,
        } => {
            let handle = FolderHandle::new(dir)?;
            let compression = if stored {
                Compression::Stored
            } else {
                Compression::Deflated
            };
            let used = handle.zip_to(&dest, option, compression)?;
            out::print_success(&format!("packed into {}", used.display()));
        }
        #[cfg(feature = "archive")]
        Command::Unzip { archive, dest } => {
            let handle = FolderHandle::new(dest)?;
            handle.unzip_from(&archive)?;
            out::print_success(&format!("unpacked into {}", handle.path().display()));
        }
        Command::Watch { dir, recursive } => {
            let mut handle = FolderHandle::new(dir)?;
            handle.watch(recursive)?;
            out::print_info(&format!(
                "watching {} (Ctrl-C to stop)",
                handle.path().display()
            ));
            while !cancel.is_cancelled() {
                if let Some(event) = handle.wait_for_change(Duration::from_millis(500)) {
                    out::print_user(&format!("{event:?}"));
                }
            }
            handle.unwatch();
        }
        Command::Size { path } => {
            let meta = fs::metadata(&path)
                .with_context(|| format!("cannot stat '{}'", path.display()))?;
            out::print_user(&format_bytes(meta.len()));
        }
    }

    Ok(())
}
