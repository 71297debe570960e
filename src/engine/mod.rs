// src/engine/mod.rs

//! Orchestration engine for gomon.
//!
//! This module ties together:
//! - the debounce filter (which changes restart the program)
//! - the process supervisor (kill-before-start)
//! - the main event loop that reacts to:
//!   - file change events and watcher errors
//!   - shutdown requests from signals or internal faults
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`]. [`shutdown`] runs the one-time teardown,
//! [`signals`] and [`fault`] feed it.

use std::fmt;

use crate::watch::ChangeEvent;

/// Why the supervisor is shutting down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Termination signal, e.g. `"SIGINT"`.
    Signal(String),
    /// Unexpected internal fault (panic) caught at a task boundary.
    Fault(String),
    /// The program could not be launched during a restart.
    LaunchFailed(String),
}

impl ShutdownReason {
    /// Whether the process should exit with a failure status.
    pub fn is_failure(&self) -> bool {
        matches!(self, ShutdownReason::LaunchFailed(_))
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(name) => write!(f, "received {name}"),
            ShutdownReason::Fault(msg) => write!(f, "internal fault: {msg}"),
            ShutdownReason::LaunchFailed(msg) => write!(f, "launch failed: {msg}"),
        }
    }
}

/// Runtime options used by the core.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Register directories created after startup.
    pub watch_new_dirs: bool,
}

/// Events flowing into the runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Raw change from the change source.
    Change(ChangeEvent),
    /// Transient error reported by the change source.
    SourceError(String),
    /// Stop everything.
    ShutdownRequested(ShutdownReason),
}

pub mod core;
pub mod fault;
pub mod runtime;
pub mod shutdown;
pub mod signals;

pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use fault::{panic_message, spawn_guarded};
pub use runtime::Runtime;
pub use shutdown::{ExitSignal, ShutdownCoordinator};
pub use signals::spawn_signal_listener;
