// src/engine/shutdown.rs

//! One-time orderly shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::engine::ShutdownReason;
use crate::exec::{ProcessBackend, Supervisor};
use crate::watch::ChangeSource;

/// Drives the shutdown sequence exactly once per process lifetime:
/// close the watches, terminate the supervisor, then fire the exit signal.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    fired: AtomicBool,
    exit_tx: Mutex<Option<oneshot::Sender<ShutdownReason>>>,
}

/// Receiving end of the exit signal, held by the main control flow.
#[derive(Debug)]
pub struct ExitSignal {
    rx: oneshot::Receiver<ShutdownReason>,
}

impl ExitSignal {
    /// Wait until shutdown has completed.
    ///
    /// Returns `None` if the coordinator was dropped without shutting down.
    pub async fn wait(self) -> Option<ShutdownReason> {
        self.rx.await.ok()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, ExitSignal) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                fired: AtomicBool::new(false),
                exit_tx: Mutex::new(Some(tx)),
            },
            ExitSignal { rx },
        )
    }

    /// Whether shutdown has been started.
    pub fn is_triggered(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Run the shutdown sequence.
    ///
    /// Returns `false` (and does nothing) if shutdown already started.
    pub async fn shutdown<S, B>(
        &self,
        reason: ShutdownReason,
        source: &Mutex<S>,
        supervisor: &Supervisor<B>,
    ) -> bool
    where
        S: ChangeSource + ?Sized,
        B: ProcessBackend,
    {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!(%reason, "shutdown already in progress; ignoring");
            return false;
        }
        info!(%reason, "shutdown requested");

        {
            let mut source = source.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            source.close();
        }

        supervisor.terminate().await;

        info!("shutting down...");
        let tx = self
            .exit_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(tx) = tx {
            let _ = tx.send(reason);
        }
        true
    }
}
