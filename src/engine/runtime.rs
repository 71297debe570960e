// src/engine/runtime.rs

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::exec::{ProcessBackend, RestartOutcome, Supervisor};
use crate::watch::{register_all, ChangeEvent, ChangeSource, ChangeStreams};

use super::core::CoreRuntime;
use super::fault::spawn_guarded;
use super::shutdown::ShutdownCoordinator;
use super::{CoreCommand, RuntimeEvent, ShutdownReason};

/// Drives the core in response to change events and control events, and
/// carries out its commands against the supervisor and the change source.
///
/// Restarts run in their own guarded tasks so that the loop keeps draining
/// events (and can coalesce triggers) while a slow program is stopping.
pub struct Runtime<B: ProcessBackend, S: ChangeSource> {
    core: CoreRuntime,
    streams: ChangeStreams,
    control_tx: mpsc::Sender<RuntimeEvent>,
    control_rx: mpsc::Receiver<RuntimeEvent>,
    supervisor: Arc<Supervisor<B>>,
    source: Arc<Mutex<S>>,
    coordinator: Arc<ShutdownCoordinator>,
}

impl<B: ProcessBackend, S: ChangeSource> fmt::Debug for Runtime<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend, S: ChangeSource + 'static> Runtime<B, S> {
    /// `control_tx` must be the sender paired with `control_rx`; it is
    /// handed to restart tasks so they can report fatal launch failures.
    pub fn new(
        core: CoreRuntime,
        streams: ChangeStreams,
        control: (mpsc::Sender<RuntimeEvent>, mpsc::Receiver<RuntimeEvent>),
        supervisor: Arc<Supervisor<B>>,
        source: Arc<Mutex<S>>,
        coordinator: Arc<ShutdownCoordinator>,
    ) -> Self {
        let (control_tx, control_rx) = control;
        Self {
            core,
            streams,
            control_tx,
            control_rx,
            supervisor,
            source,
            coordinator,
        }
    }

    /// Main event loop.
    ///
    /// Runs until a shutdown has been carried out, and returns its reason.
    pub async fn run(mut self) -> Result<ShutdownReason> {
        info!("gomon runtime started");

        loop {
            let event = tokio::select! {
                Some(change) = self.streams.events.recv() => RuntimeEvent::Change(change),
                Some(err) = self.streams.errors.recv() => {
                    RuntimeEvent::SourceError(err.to_string())
                }
                Some(event) = self.control_rx.recv() => event,
                else => RuntimeEvent::ShutdownRequested(ShutdownReason::Fault(
                    "all event streams closed".to_string(),
                )),
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            let mut reason = None;
            for command in step.commands {
                if let Some(r) = self.execute_command(command).await {
                    reason = Some(r);
                }
            }

            if !step.keep_running {
                info!("runtime exiting");
                return Ok(reason.unwrap_or_else(|| {
                    ShutdownReason::Fault("runtime stopped without a shutdown request".to_string())
                }));
            }
        }
    }

    /// Execute a single command from the core. Returns the reason when the
    /// command was a shutdown.
    async fn execute_command(&mut self, command: CoreCommand) -> Option<ShutdownReason> {
        match command {
            CoreCommand::Restart(cause) => {
                self.spawn_restart(cause);
                None
            }
            CoreCommand::WatchDirs(dirs) => {
                let mut source = self.source.lock().unwrap_or_else(|p| p.into_inner());
                register_all(&mut *source, &dirs);
                None
            }
            CoreCommand::Shutdown(reason) => {
                self.coordinator
                    .shutdown(reason.clone(), self.source.as_ref(), self.supervisor.as_ref())
                    .await;
                Some(reason)
            }
        }
    }

    fn spawn_restart(&self, cause: ChangeEvent) {
        let supervisor = Arc::clone(&self.supervisor);
        let control_tx = self.control_tx.clone();

        spawn_guarded(
            "restart",
            async move {
                match supervisor.restart(Some(&cause)).await {
                    Ok(RestartOutcome::Restarted { pgid }) => {
                        debug!(pgid, "restart complete");
                    }
                    Ok(outcome) => debug!(?outcome, "restart skipped"),
                    Err(err) => {
                        error!(error = %err, "unable to start process");
                        let _ = control_tx
                            .send(RuntimeEvent::ShutdownRequested(ShutdownReason::LaunchFailed(
                                err.to_string(),
                            )))
                            .await;
                    }
                }
            },
            self.control_tx.clone(),
        );
    }
}
