// src/watch/event.rs

//! Change events as seen by the rest of the supervisor.

use std::path::{Path, PathBuf};
use std::time::Instant;

use notify::event::{EventKind, ModifyKind};

/// Kind of filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Remove,
    Modify,
    Rename,
    AttributeChange,
}

impl Operation {
    /// Short label used in log lines.
    pub fn describe(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Remove => "delete",
            Operation::Modify => "modify",
            Operation::Rename => "rename",
            Operation::AttributeChange => "chmod",
        }
    }

    /// Translate a `notify` event kind.
    ///
    /// Returns `None` for access notifications (open/read/close), which do
    /// not change anything on disk.
    pub fn from_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Access(_) => None,
            EventKind::Create(_) => Some(Operation::Create),
            EventKind::Remove(_) => Some(Operation::Remove),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Operation::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(Operation::AttributeChange),
            EventKind::Modify(_) | EventKind::Any | EventKind::Other => Some(Operation::Modify),
        }
    }
}

/// A single change notification for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// `None` when the OS reported a change without naming a path.
    pub path: Option<PathBuf>,
    pub operation: Operation,
    pub at: Instant,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, operation: Operation) -> Self {
        Self::at(Some(path.into()), operation, Instant::now())
    }

    pub fn at(path: Option<PathBuf>, operation: Operation, at: Instant) -> Self {
        Self {
            path,
            operation,
            at,
        }
    }

    /// Split a `notify` event into one change event per path.
    pub fn from_notify(event: notify::Event) -> Vec<ChangeEvent> {
        let Some(operation) = Operation::from_kind(&event.kind) else {
            return Vec::new();
        };
        let at = Instant::now();

        if event.paths.is_empty() {
            return vec![ChangeEvent::at(None, operation, at)];
        }

        event
            .paths
            .into_iter()
            .map(|path| ChangeEvent::at(Some(path), operation, at))
            .collect()
    }

    /// Base name of the changed path, for logging.
    pub fn file_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
