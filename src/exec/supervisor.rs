// src/exec/supervisor.rs

//! Process supervisor: owns the single supervised child.
//!
//! Every start and kill happens while holding the restart gate, so there is
//! never more than one child alive:
//!
//! ```text
//! Idle -> Starting -> Running -> Terminating -> Idle -> ...
//!                                     \-> Terminated (final shutdown)
//! ```
//!
//! A restart that finds the gate taken does not wait for it; the restart
//! already in flight will start a fresh child anyway, so the trigger is
//! coalesced into it. Shutdown, on the other hand, waits for the gate so it
//! never races a start.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::config::CommandSpec;
use crate::errors::Result;
use crate::exec::backend::{ExitOutcome, ProcessBackend};
use crate::exec::group::{GroupSignal, KillOutcome};
use crate::watch::ChangeEvent;

/// Lifecycle state of the supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Idle,
    Starting,
    Running,
    Terminating,
    Terminated,
}

/// Observable snapshot of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub state: ProcessState,
    /// Incremented on every launch; 0 before the first one.
    pub generation: u64,
    /// Group id of the live child, if any.
    pub pgid: Option<u32>,
}

/// What a call to [`Supervisor::restart`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// The previous child (if any) is gone and a new one runs in `pgid`.
    Restarted { pgid: u32 },
    /// Another restart or a shutdown held the gate.
    Coalesced,
    /// The supervisor has been terminated.
    Rejected,
}

/// Book-keeping for the current (possibly already exited) child.
struct ActiveChild {
    generation: u64,
    pgid: u32,
    exit_rx: watch::Receiver<Option<ExitOutcome>>,
    stop_requested: Arc<AtomicBool>,
}

/// State guarded by the restart gate.
#[derive(Default)]
struct Slot {
    child: Option<ActiveChild>,
    terminated: bool,
}

pub struct Supervisor<B: ProcessBackend> {
    backend: B,
    command: CommandSpec,
    kill_grace: Duration,
    gate: Mutex<Slot>,
    status: Arc<watch::Sender<Status>>,
}

impl<B: ProcessBackend> std::fmt::Debug for Supervisor<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("command", &self.command)
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(backend: B, command: CommandSpec, kill_grace: Duration) -> Self {
        let (status, _) = watch::channel(Status {
            state: ProcessState::Idle,
            generation: 0,
            pgid: None,
        });
        Self {
            backend,
            command,
            kill_grace,
            gate: Mutex::new(Slot::default()),
            status: Arc::new(status),
        }
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    pub fn state(&self) -> ProcessState {
        self.status.borrow().state
    }

    pub fn current_pgid(&self) -> Option<u32> {
        self.status.borrow().pgid
    }

    /// Number of launches so far.
    pub fn generation(&self) -> u64 {
        self.status.borrow().generation
    }

    /// Watch status transitions (used by tests and diagnostics).
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Launch the program for the first time.
    ///
    /// Equivalent to a restart that waits for the gate instead of
    /// coalescing. Fails if the program cannot be launched.
    pub async fn start(&self) -> Result<RestartOutcome> {
        let mut slot = self.gate.lock().await;
        if slot.terminated {
            return Ok(RestartOutcome::Rejected);
        }
        self.replace_child(&mut slot).await
    }

    /// Stop the current child and start a new one.
    ///
    /// Returns `Coalesced` immediately if a restart or shutdown is already
    /// in progress. An `Err` means the program could not be launched.
    pub async fn restart(&self, cause: Option<&ChangeEvent>) -> Result<RestartOutcome> {
        let Ok(mut slot) = self.gate.try_lock() else {
            debug!(
                cause = ?cause.and_then(|c| c.path.as_ref()),
                "restart already in progress; coalescing"
            );
            return Ok(RestartOutcome::Coalesced);
        };
        if slot.terminated {
            debug!("supervisor terminated; not restarting");
            return Ok(RestartOutcome::Rejected);
        }
        self.replace_child(&mut slot).await
    }

    /// Stop the current child (whole group) without starting another.
    ///
    /// Waits for any in-flight restart to finish first.
    pub async fn kill(&self) {
        let mut slot = self.gate.lock().await;
        if let Some(mut child) = slot.child.take() {
            self.stop_child(&mut child).await;
        }
        if !slot.terminated {
            self.set_state(ProcessState::Idle, None);
        }
    }

    /// Final shutdown: stop the child and refuse all further starts.
    ///
    /// Returns `false` if the supervisor was already terminated.
    pub async fn terminate(&self) -> bool {
        let mut slot = self.gate.lock().await;
        if slot.terminated {
            return false;
        }
        slot.terminated = true;
        if let Some(child) = slot.child.as_mut() {
            self.stop_child(child).await;
        }
        slot.child = None;
        self.set_state(ProcessState::Terminated, None);
        true
    }

    /// Kill-before-start. Caller holds the gate.
    async fn replace_child(&self, slot: &mut Slot) -> Result<RestartOutcome> {
        if let Some(mut previous) = slot.child.take() {
            self.stop_child(&mut previous).await;
        }
        let pgid = self.launch(slot)?;
        Ok(RestartOutcome::Restarted { pgid })
    }

    fn launch(&self, slot: &mut Slot) -> Result<u32> {
        let generation = self.status.borrow().generation + 1;
        self.status.send_modify(|s| {
            s.state = ProcessState::Starting;
            s.generation = generation;
            s.pgid = None;
        });

        info!(command = %self.command, generation, "starting process");
        let launched = match self.backend.launch(&self.command) {
            Ok(launched) => launched,
            Err(err) => {
                self.set_state(ProcessState::Idle, None);
                return Err(err);
            }
        };
        let pgid = launched.pgid;

        // Running must be published before the waiter can observe an exit.
        self.set_state(ProcessState::Running, Some(pgid));

        let (exit_tx, exit_rx) = watch::channel(None);
        let stop_requested = Arc::new(AtomicBool::new(false));

        tokio::spawn(wait_for_exit(
            launched.exit,
            generation,
            pgid,
            exit_tx,
            Arc::clone(&stop_requested),
            Arc::clone(&self.status),
        ));

        slot.child = Some(ActiveChild {
            generation,
            pgid,
            exit_rx,
            stop_requested,
        });
        Ok(pgid)
    }

    /// Signal the child's group and wait for the leader to exit, escalating
    /// to a forced kill after the grace period.
    async fn stop_child(&self, child: &mut ActiveChild) {
        child.stop_requested.store(true, Ordering::SeqCst);
        self.set_state(ProcessState::Terminating, Some(child.pgid));

        // The group can outlive its leader, so signal it even if the leader
        // has already exited.
        self.signal_group(child, GroupSignal::Terminate);
        if wait_exit(&mut child.exit_rx, self.kill_grace).await {
            return;
        }

        warn!(
            pgid = child.pgid,
            grace = ?self.kill_grace,
            "process did not stop in time; killing"
        );
        self.signal_group(child, GroupSignal::Kill);
        if !wait_exit(&mut child.exit_rx, self.kill_grace).await {
            warn!(pgid = child.pgid, "process still running after SIGKILL; giving up on it");
        }
    }

    fn signal_group(&self, child: &ActiveChild, signal: GroupSignal) {
        match self.backend.kill_group(child.pgid, signal) {
            Ok(KillOutcome::Signalled) => {
                debug!(
                    pgid = child.pgid,
                    generation = child.generation,
                    ?signal,
                    "signalled process group"
                );
            }
            Ok(KillOutcome::AlreadyExited) => {
                debug!(
                    pgid = child.pgid,
                    generation = child.generation,
                    "process group already gone"
                );
            }
            Err(err) => {
                warn!(pgid = child.pgid, ?signal, error = %err, "failed to signal process group");
            }
        }
    }

    fn set_state(&self, state: ProcessState, pgid: Option<u32>) {
        self.status.send_modify(|s| {
            s.state = state;
            s.pgid = pgid;
        });
    }
}

/// Wait up to `grace` for the exit to be published.
///
/// A dropped sender means the waiter is gone, which only happens after the
/// exit was observed.
async fn wait_exit(rx: &mut watch::Receiver<Option<ExitOutcome>>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, rx.wait_for(Option::is_some)).await {
        Ok(_) => true,
        Err(_) => false,
    }
}

/// Background waiter for one child.
async fn wait_for_exit(
    exit: crate::exec::backend::ExitFuture,
    generation: u64,
    pgid: u32,
    exit_tx: watch::Sender<Option<ExitOutcome>>,
    stop_requested: Arc<AtomicBool>,
    status: Arc<watch::Sender<Status>>,
) {
    let outcome = exit.await;

    if stop_requested.load(Ordering::SeqCst) {
        debug!(pgid, generation, ?outcome, "process stopped");
    } else {
        match &outcome {
            ExitOutcome::Clean => info!(pgid, generation, "process exited cleanly"),
            ExitOutcome::Crashed(code) => {
                warn!(pgid, generation, exit_code = ?code, "process crashed");
                info!("waiting for changes before restarting");
            }
            ExitOutcome::WaitFailed(err) => {
                warn!(pgid, generation, error = %err, "lost track of process");
            }
        }
    }

    // A running child that exits on its own leaves the supervisor idle.
    status.send_if_modified(|s| {
        if s.generation == generation && s.state == ProcessState::Running {
            s.state = ProcessState::Idle;
            s.pgid = None;
            true
        } else {
            false
        }
    });

    let _ = exit_tx.send(Some(outcome));
}
