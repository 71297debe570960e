// src/engine/signals.rs

//! OS termination signals → shutdown requests.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::engine::{RuntimeEvent, ShutdownReason};
use crate::errors::{GomonError, Result};

/// Listen for SIGINT, SIGHUP and SIGTERM and forward each as a
/// `ShutdownRequested` event.
///
/// Handlers are registered before this returns, so a registration failure
/// is reported at startup.
#[cfg(unix)]
pub fn spawn_signal_listener(control_tx: mpsc::Sender<RuntimeEvent>) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).map_err(GomonError::Signal)?;
    let mut sighup = signal(SignalKind::hangup()).map_err(GomonError::Signal)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(GomonError::Signal)?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = sigint.recv() => "SIGINT",
                _ = sighup.recv() => "SIGHUP",
                _ = sigterm.recv() => "SIGTERM",
            };
            info!(signal = name, "received termination signal");
            let event = RuntimeEvent::ShutdownRequested(ShutdownReason::Signal(name.to_string()));
            if control_tx.send(event).await.is_err() {
                break;
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(control_tx: mpsc::Sender<RuntimeEvent>) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %GomonError::Signal(err), "signal listener stopped");
                break;
            }
            info!(signal = "ctrl-c", "received termination signal");
            let event =
                RuntimeEvent::ShutdownRequested(ShutdownReason::Signal("ctrl-c".to_string()));
            if control_tx.send(event).await.is_err() {
                break;
            }
        }
    }))
}
