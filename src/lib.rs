// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{load_from_args, SupervisorConfig};
use crate::engine::{
    panic_message, spawn_signal_listener, CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions,
    ShutdownCoordinator, ShutdownReason,
};
use crate::exec::{RealProcessBackend, Supervisor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{
    enumerate, register_all, DebounceFilter, IgnoreRules, NotifySource, RelevanceRules,
};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config from the CLI
/// - directory enumeration and the file watcher
/// - the process supervisor and its first launch
/// - signal handling and the shutdown coordinator
/// - the runtime event loop, behind a panic boundary
///
/// Returns `Ok(())` after a graceful shutdown. Startup failures, and a
/// program that can no longer be launched, are returned as errors.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_from_args(&args)?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: SupervisorConfig) -> Result<()> {
    run_with_control(cfg, mpsc::channel::<RuntimeEvent>(16)).await
}

/// Same as [`run_with_config`], using a caller-provided control channel.
///
/// Anything sent on the sender is handled like a signal: a
/// `ShutdownRequested` event stops the supervisor, and its reason decides
/// between `Ok(())` and an error.
pub async fn run_with_control(
    cfg: SupervisorConfig,
    control: (mpsc::Sender<RuntimeEvent>, mpsc::Receiver<RuntimeEvent>),
) -> Result<()> {
    info!(root = ?cfg.root, command = %cfg.command, "starting gomon");
    let started_at = Instant::now();

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let ignore = IgnoreRules::new(&cfg.ignore)?;

    // Watch set. An unreadable root or a missing watch subsystem is fatal.
    let dirs = enumerate(fs.as_ref(), &cfg.root, &ignore)?;
    let (mut source, streams) = NotifySource::open()?;
    register_all(&mut source, &dirs);
    let source = Arc::new(Mutex::new(source));

    let (control_tx, control_rx) = control;
    let _signals = spawn_signal_listener(control_tx.clone())?;

    let supervisor = Arc::new(Supervisor::new(
        RealProcessBackend,
        cfg.command.clone(),
        cfg.kill_grace,
    ));
    supervisor.start().await?;

    let (coordinator, exit) = ShutdownCoordinator::new();
    let coordinator = Arc::new(coordinator);

    let filter = DebounceFilter::new(
        cfg.debounce,
        RelevanceRules::new(cfg.extensions.iter().cloned()),
        Arc::clone(&fs),
        started_at,
    );
    let core = CoreRuntime::new(
        filter,
        ignore,
        fs,
        RuntimeOptions {
            watch_new_dirs: cfg.watch_new_dirs,
        },
    );

    let runtime = Runtime::new(
        core,
        streams,
        (control_tx, control_rx),
        Arc::clone(&supervisor),
        Arc::clone(&source),
        Arc::clone(&coordinator),
    );

    // Top-level fault boundary: whatever happens to the loop, the child
    // group is terminated and the watches are released.
    match tokio::spawn(runtime.run()).await {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => {
            error!(error = %err, "runtime failed");
            let reason = ShutdownReason::Fault(err.to_string());
            coordinator.shutdown(reason, source.as_ref(), supervisor.as_ref()).await;
        }
        Err(join_err) => {
            let msg = if join_err.is_panic() {
                panic_message(join_err.into_panic())
            } else {
                "event loop cancelled".to_string()
            };
            error!(panic = %msg, "event loop crashed");
            let reason = ShutdownReason::Fault(msg);
            coordinator.shutdown(reason, source.as_ref(), supervisor.as_ref()).await;
        }
    }

    match exit.wait().await {
        Some(reason) if reason.is_failure() => Err(anyhow!("{reason}")),
        Some(reason) => {
            info!(%reason, "gomon stopped");
            Ok(())
        }
        None => Err(anyhow!("shutdown did not complete")),
    }
}
