// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the supervised command
//! with `tokio::process::Command` and for stopping it again, including every
//! process it spawned.
//!
//! - [`command`] builds the OS command (own process group, inherited output).
//! - [`group`] signals a whole process group.
//! - [`backend`] provides the `ProcessBackend` trait and the production
//!   `RealProcessBackend`, which tests can replace with a fake.
//! - [`supervisor`] owns the single child and serializes start/kill.

pub mod backend;
pub mod command;
pub mod group;
pub mod supervisor;

pub use backend::{ExitFuture, ExitOutcome, LaunchedProcess, ProcessBackend, RealProcessBackend};
pub use group::{kill_group, GroupSignal, KillOutcome};
pub use supervisor::{ProcessState, RestartOutcome, Status, Supervisor};
