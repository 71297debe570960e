// src/engine/fault.rs

//! Fault boundary for background tasks.

use std::any::Any;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

use crate::engine::{RuntimeEvent, ShutdownReason};

/// Spawn `fut` so that a panic inside it becomes a shutdown request instead
/// of a silently dead task (and an orphaned process group).
pub fn spawn_guarded<F>(
    name: &'static str,
    fut: F,
    control_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let inner = tokio::spawn(fut);
    tokio::spawn(async move {
        if let Err(err) = inner.await {
            if err.is_panic() {
                let msg = panic_message(err.into_panic());
                error!(task = name, panic = %msg, "task panicked; shutting down");
                let _ = control_tx
                    .send(RuntimeEvent::ShutdownRequested(ShutdownReason::Fault(
                        format!("{name} panicked: {msg}"),
                    )))
                    .await;
            }
        }
    })
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
