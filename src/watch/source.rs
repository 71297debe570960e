// src/watch/source.rs

//! The change event source: OS watch registrations plus the streams of
//! events and errors they produce.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{GomonError, Result};
use crate::watch::event::ChangeEvent;

/// Control surface of a change source.
///
/// The event and error streams are handed out once, when the source is
/// opened (see [`ChangeStreams`]); this trait only covers registration and
/// teardown so that the shutdown path can be exercised without a real
/// watcher.
pub trait ChangeSource: Send {
    /// Start watching a single directory (non-recursively).
    fn watch(&mut self, dir: &Path) -> Result<()>;

    /// Release every OS registration. Calling it again is a no-op.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Receiving half of a change source: raw events and transient errors.
///
/// Both streams end once the source is closed.
#[derive(Debug)]
pub struct ChangeStreams {
    pub events: mpsc::UnboundedReceiver<ChangeEvent>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

/// Sending half matching [`ChangeStreams`].
#[derive(Debug, Clone)]
pub struct ChangeSink {
    pub events: mpsc::UnboundedSender<ChangeEvent>,
    pub errors: mpsc::UnboundedSender<notify::Error>,
}

/// Create a connected sink/streams pair.
pub fn change_channel() -> (ChangeSink, ChangeStreams) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (errors_tx, errors_rx) = mpsc::unbounded_channel();
    (
        ChangeSink {
            events: events_tx,
            errors: errors_tx,
        },
        ChangeStreams {
            events: events_rx,
            errors: errors_rx,
        },
    )
}

/// Change source backed by `notify`'s recommended watcher for the platform.
pub struct NotifySource {
    watcher: Option<RecommendedWatcher>,
    watched: BTreeSet<PathBuf>,
}

impl fmt::Debug for NotifySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifySource")
            .field("closed", &self.watcher.is_none())
            .field("watched", &self.watched.len())
            .finish()
    }
}

impl NotifySource {
    /// Create the OS watcher. Failing here means the watch subsystem is
    /// unavailable, which is fatal for the supervisor.
    pub fn open() -> Result<(Self, ChangeStreams)> {
        let (sink, streams) = change_channel();

        // Called synchronously by notify on its own thread.
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(event) {
                        // The receiver is gone only while shutting down.
                        let _ = sink.events.send(change);
                    }
                }
                Err(err) => {
                    let _ = sink.errors.send(err);
                }
            },
            Config::default(),
        )
        .map_err(GomonError::WatchInit)?;

        Ok((
            Self {
                watcher: Some(watcher),
                watched: BTreeSet::new(),
            },
            streams,
        ))
    }

    /// Directories currently registered.
    pub fn watched(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }
}

impl ChangeSource for NotifySource {
    fn watch(&mut self, dir: &Path) -> Result<()> {
        let watcher = self.watcher.as_mut().ok_or_else(|| GomonError::Watch {
            path: dir.to_path_buf(),
            source: notify::Error::generic("watcher already closed"),
        })?;

        if self.watched.contains(dir) {
            return Ok(());
        }

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| GomonError::Watch {
                path: dir.to_path_buf(),
                source,
            })?;
        self.watched.insert(dir.to_path_buf());
        Ok(())
    }

    fn close(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            // Dropping the watcher removes every registration and drops the
            // callback, which ends both streams.
            drop(watcher);
            debug!(count = self.watched.len(), "closed file watches");
            self.watched.clear();
        }
    }

    fn is_closed(&self) -> bool {
        self.watcher.is_none()
    }
}

/// Register every directory in `dirs`, logging and skipping failures.
///
/// Returns how many registrations succeeded.
pub fn register_all<S: ChangeSource + ?Sized>(source: &mut S, dirs: &[PathBuf]) -> usize {
    let mut ok = 0;
    for dir in dirs {
        match source.watch(dir) {
            Ok(()) => ok += 1,
            Err(err) => warn!(dir = ?dir, error = %err, "error watching directory"),
        }
    }
    info!(watched = ok, total = dirs.len(), "registered directory watches");
    ok
}
