use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gomon::errors::{GomonError, Result};
use gomon::watch::ChangeSource;

#[derive(Default)]
struct Inner {
    watched: Vec<PathBuf>,
    fail_on: HashSet<PathBuf>,
    close_calls: usize,
    closed: bool,
}

/// A change source that records registrations and teardown instead of
/// talking to the OS. Events are fed through a `ChangeSink` from
/// `gomon::watch::change_channel`.
#[derive(Clone, Default)]
pub struct FakeChangeSource {
    inner: Arc<Mutex<Inner>>,
}

impl FakeChangeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `watch(dir)` fail.
    pub fn fail_on(&self, dir: impl Into<PathBuf>) {
        self.inner.lock().unwrap().fail_on.insert(dir.into());
    }

    pub fn watched(&self) -> Vec<PathBuf> {
        self.inner.lock().unwrap().watched.clone()
    }

    /// How many times `close` was called (including no-op repeats).
    pub fn close_calls(&self) -> usize {
        self.inner.lock().unwrap().close_calls
    }
}

impl ChangeSource for FakeChangeSource {
    fn watch(&mut self, dir: &Path) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            return Err(GomonError::IoError(io::Error::other("source closed")));
        }
        if inner.fail_on.contains(dir) {
            return Err(GomonError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "watch refused",
            )));
        }
        if !inner.watched.iter().any(|d| d == dir) {
            inner.watched.push(dir.to_path_buf());
        }
        Ok(())
    }

    fn close(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.close_calls += 1;
        inner.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}
