// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! Consumes [`RuntimeEvent`]s and produces a list of commands describing
//! what the IO shell should do next. It owns the debounce filter and never
//! touches processes, channels or watches, so it can be tested with a mock
//! filesystem and hand-made events.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::{RuntimeEvent, RuntimeOptions, ShutdownReason};
use crate::fs::{EntryKind, FileSystem};
use crate::watch::{enumerate, ChangeEvent, DebounceFilter, IgnoreRules, Operation, Verdict};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreCommand {
    /// Kill the current program and start it again.
    Restart(ChangeEvent),
    /// Register these newly discovered directories with the change source.
    WatchDirs(Vec<PathBuf>),
    /// Run the shutdown sequence.
    Shutdown(ShutdownReason),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct CoreRuntime {
    filter: DebounceFilter,
    ignore: IgnoreRules,
    fs: Arc<dyn FileSystem>,
    options: RuntimeOptions,
    shutting_down: bool,
}

impl CoreRuntime {
    pub fn new(
        filter: DebounceFilter,
        ignore: IgnoreRules,
        fs: Arc<dyn FileSystem>,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            filter,
            ignore,
            fs,
            options,
            shutting_down: false,
        }
    }

    pub fn filter(&self) -> &DebounceFilter {
        &self.filter
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Handle a single runtime event.
    ///
    /// Once a shutdown has been requested every further event is dropped.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        if self.shutting_down {
            return CoreStep {
                commands: Vec::new(),
                keep_running: false,
            };
        }

        match event {
            RuntimeEvent::Change(change) => self.handle_change(change),
            RuntimeEvent::SourceError(err) => {
                warn!(error = %err, "file watch error");
                CoreStep::continue_with(Vec::new())
            }
            RuntimeEvent::ShutdownRequested(reason) => {
                self.shutting_down = true;
                CoreStep {
                    commands: vec![CoreCommand::Shutdown(reason)],
                    keep_running: false,
                }
            }
        }
    }

    fn handle_change(&mut self, change: ChangeEvent) -> CoreStep {
        let mut commands = Vec::new();

        // Registration is independent of the debounce window.
        if self.options.watch_new_dirs {
            if let Some(dirs) = self.new_directories(&change) {
                commands.push(CoreCommand::WatchDirs(dirs));
            }
        }

        match self.filter.should_act(&change) {
            Verdict::Restart => {
                info!(
                    op = change.operation.describe(),
                    file = %change.file_name(),
                    "change detected"
                );
                info!("restarting...");
                commands.push(CoreCommand::Restart(change));
            }
            Verdict::Vanished => {
                debug!(path = ?change.path, "changed path vanished; not restarting");
            }
            Verdict::Suppressed | Verdict::NoPath | Verdict::Irrelevant => {}
        }

        CoreStep::continue_with(commands)
    }

    /// Directories to register for a `Create` of a non-ignored directory.
    fn new_directories(&self, change: &ChangeEvent) -> Option<Vec<PathBuf>> {
        if change.operation != Operation::Create {
            return None;
        }
        let path = change.path.as_deref()?;
        if self.ignore.is_ignored_path(path) {
            return None;
        }
        if !matches!(self.fs.kind(path), Ok(EntryKind::Dir)) {
            return None;
        }

        match enumerate(self.fs.as_ref(), path, &self.ignore) {
            Ok(dirs) => Some(dirs),
            Err(err) => {
                warn!(dir = ?path, error = %err, "cannot enumerate new directory");
                None
            }
        }
    }
}
