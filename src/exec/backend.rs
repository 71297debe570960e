// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The supervisor talks to a `ProcessBackend` instead of spawning processes
//! itself. Production code uses [`RealProcessBackend`]; tests provide a fake
//! that records launches and kills without touching the OS.

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::ExitStatus;

use crate::config::CommandSpec;
use crate::errors::{GomonError, Result};
use crate::exec::command::build_command;
use crate::exec::group::{self, GroupSignal, KillOutcome};

/// How a supervised process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit status 0.
    Clean,
    /// Non-zero exit code, or `None` when terminated by a signal.
    Crashed(Option<i32>),
    /// We lost track of the process (waiting on it failed).
    WaitFailed(String),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            ExitOutcome::Clean
        } else {
            ExitOutcome::Crashed(status.code())
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ExitOutcome::Clean)
    }
}

/// Future resolving when a launched process exits.
pub type ExitFuture = Pin<Box<dyn Future<Output = ExitOutcome> + Send>>;

/// A freshly started process.
pub struct LaunchedProcess {
    /// Process group id (the leader's pid).
    pub pgid: u32,
    pub exit: ExitFuture,
}

impl fmt::Debug for LaunchedProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchedProcess")
            .field("pgid", &self.pgid)
            .finish_non_exhaustive()
    }
}

/// Trait abstracting how processes are started and stopped.
pub trait ProcessBackend: Send + Sync + 'static {
    /// Start `command` in a new process group.
    ///
    /// An error here means the program cannot be run at all.
    fn launch(&self, command: &CommandSpec) -> Result<LaunchedProcess>;

    /// Signal the whole group `pgid`.
    fn kill_group(&self, pgid: u32, signal: GroupSignal) -> io::Result<KillOutcome>;
}

/// Backend that spawns real OS processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessBackend;

impl ProcessBackend for RealProcessBackend {
    fn launch(&self, command: &CommandSpec) -> Result<LaunchedProcess> {
        let mut child = build_command(command)
            .spawn()
            .map_err(|source| GomonError::Launch {
                program: command.program.clone(),
                source,
            })?;

        let pgid = child.id().ok_or_else(|| GomonError::Launch {
            program: command.program.clone(),
            source: io::Error::other("process exited before its pid was known"),
        })?;

        let exit: ExitFuture = Box::pin(async move {
            match child.wait().await {
                Ok(status) => ExitOutcome::from_status(status),
                Err(err) => ExitOutcome::WaitFailed(err.to_string()),
            }
        });

        Ok(LaunchedProcess { pgid, exit })
    }

    fn kill_group(&self, pgid: u32, signal: GroupSignal) -> io::Result<KillOutcome> {
        group::kill_group(pgid, signal)
    }
}
