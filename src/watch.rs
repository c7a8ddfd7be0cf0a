//! Change notification.
//!
//! Wraps a `notify` recommended watcher behind an explicit start/stop API:
//! [`watch_path`] registers the OS watcher and returns a [`WatcherHandle`]
//! whose channel delivers [`WatchEvent`]s. Dropping the handle (or calling
//! [`WatcherHandle::stop`]) unregisters the watcher.
//!
//! The notify backend runs its own listener thread; whether to block on
//! [`WatcherHandle::wait`] inline or from a spawned thread is the caller's
//! choice. A wait that times out returns `None`, which only the call site can
//! tell apart from a quiet directory.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError, channel};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

use crate::errors::{FileKitError, Result};

/// A filesystem change, as a tagged variant instead of per-kind callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created(PathBuf),
    Changed(PathBuf),
    Deleted(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
    /// The watch backend reported a problem; watching continues best-effort.
    Error(String),
}

fn map_event(res: notify::Result<Event>) -> Vec<WatchEvent> {
    let event = match res {
        Ok(event) => event,
        Err(e) => return vec![WatchEvent::Error(e.to_string())],
    };
    trace!(?event, "raw watch event");

    match event.kind {
        EventKind::Create(_) => event.paths.into_iter().map(WatchEvent::Created).collect(),
        EventKind::Remove(_) => event.paths.into_iter().map(WatchEvent::Deleted).collect(),
        EventKind::Modify(ModifyKind::Name(_)) => match <[PathBuf; 2]>::try_from(event.paths) {
            Ok([from, to]) => vec![WatchEvent::Renamed { from, to }],
            // Platform reported the rename as half events; surface each side
            // as a change so nothing is silently dropped.
            Err(paths) => paths.into_iter().map(WatchEvent::Changed).collect(),
        },
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            event.paths.into_iter().map(WatchEvent::Changed).collect()
        }
        EventKind::Access(_) => Vec::new(),
    }
}

/// An active watch registration. Exclusively owned; dropping it stops the
/// watcher and closes the event channel.
pub struct WatcherHandle {
    watcher: RecommendedWatcher,
    rx: Receiver<WatchEvent>,
    root: PathBuf,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// The directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pop a pending event without blocking.
    pub fn try_event(&self) -> Option<WatchEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for the next event. `None` means the timeout
    /// elapsed with no change, which is not an error.
    pub fn wait(&self, timeout: Duration) -> Option<WatchEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Unregister the watcher explicitly. Dropping the handle does the same.
    pub fn stop(mut self) {
        let _ = self.watcher.unwatch(&self.root);
        debug!(root = %self.root.display(), "watcher stopped");
    }
}

/// Start watching `path` (which must exist), optionally recursing into
/// subdirectories.
pub fn watch_path(path: &Path, recursive: bool) -> Result<WatcherHandle> {
    if !path.exists() {
        return Err(FileKitError::NotFound(path.to_path_buf()));
    }

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        for ev in map_event(res) {
            // Receiver gone means the handle was dropped; nothing to do.
            let _ = tx.send(ev);
        }
    })
    .map_err(|e| FileKitError::Unsupported(format!("watch backend unavailable: {e}")))?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher
        .watch(path, mode)
        .map_err(|e| FileKitError::Unsupported(format!("cannot watch '{}': {e}", path.display())))?;
    debug!(root = %path.display(), recursive, "watcher started");

    Ok(WatcherHandle {
        watcher,
        rx,
        root: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watching_missing_directory_fails_fast() {
        let td = tempfile::tempdir().unwrap();
        let err = watch_path(&td.path().join("nope"), false).unwrap_err();
        assert!(matches!(err, FileKitError::NotFound(_)));
    }

    #[test]
    fn backend_errors_become_error_events() {
        let evs = map_event(Err(notify::Error::generic("boom")));
        assert!(matches!(evs.as_slice(), [WatchEvent::Error(msg)] if msg.contains("boom")));
    }
}
