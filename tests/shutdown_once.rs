// tests/shutdown_once.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::sync::Mutex;
use std::time::Duration;

use gomon::config::CommandSpec;
use gomon::engine::{ShutdownCoordinator, ShutdownReason};
use gomon::exec::{GroupSignal, ProcessState, RestartOutcome, Supervisor};
use gomon::watch::ChangeSource;
use gomon_test_utils::fake_backend::FakeBackend;
use gomon_test_utils::fake_source::FakeChangeSource;
use gomon_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn concurrent_shutdowns_run_the_sequence_once() -> TestResult {
    init_tracing();
    let backend = FakeBackend::new();
    let supervisor = Supervisor::new(
        backend.clone(),
        CommandSpec::new("go", ["run", "main.go"]),
        Duration::from_millis(500),
    );
    supervisor.start().await?;

    let fake_source = FakeChangeSource::new();
    let source = Mutex::new(fake_source.clone());
    let (coordinator, exit) = ShutdownCoordinator::new();

    let sigint = ShutdownReason::Signal("SIGINT".to_string());
    let sigterm = ShutdownReason::Signal("SIGTERM".to_string());
    let (a, b) = with_timeout(async {
        tokio::join!(
            coordinator.shutdown(sigint.clone(), &source, &supervisor),
            coordinator.shutdown(sigterm.clone(), &source, &supervisor),
        )
    })
    .await;

    assert!(a ^ b, "exactly one shutdown must run (got {a}, {b})");
    assert!(coordinator.is_triggered());
    assert_eq!(backend.kills(), vec![(1000, GroupSignal::Terminate)]);
    assert_eq!(fake_source.close_calls(), 1);
    assert!(fake_source.is_closed());
    assert_eq!(supervisor.state(), ProcessState::Terminated);

    let reason = with_timeout(exit.wait()).await;
    let expected = if a { sigint } else { sigterm };
    assert_eq!(reason, Some(expected));
    Ok(())
}

#[tokio::test]
async fn nothing_restarts_after_shutdown() -> TestResult {
    init_tracing();
    let backend = FakeBackend::new();
    let supervisor = Supervisor::new(
        backend.clone(),
        CommandSpec::new("go", ["run", "main.go"]),
        Duration::from_millis(500),
    );
    supervisor.start().await?;

    let source = Mutex::new(FakeChangeSource::new());
    let (coordinator, exit) = ShutdownCoordinator::new();

    let reason = ShutdownReason::Fault("event loop panicked".to_string());
    assert!(coordinator.shutdown(reason.clone(), &source, &supervisor).await);
    assert!(!coordinator.shutdown(reason.clone(), &source, &supervisor).await);

    assert_eq!(supervisor.restart(None).await?, RestartOutcome::Rejected);
    assert_eq!(backend.launches(), vec![1000]);

    let got = with_timeout(exit.wait()).await;
    assert_eq!(got, Some(reason));
    assert!(!got.map(|r| r.is_failure()).unwrap_or(true));
    Ok(())
}

#[tokio::test]
async fn exit_signal_reports_missing_shutdown() {
    let (coordinator, exit) = ShutdownCoordinator::new();
    drop(coordinator);
    assert_eq!(exit.wait().await, None);
}

#[test]
fn only_launch_failures_are_failures() {
    assert!(!ShutdownReason::Signal("SIGHUP".into()).is_failure());
    assert!(!ShutdownReason::Fault("boom".into()).is_failure());
    assert!(ShutdownReason::LaunchFailed("not found".into()).is_failure());
    assert_eq!(
        ShutdownReason::Signal("SIGINT".into()).to_string(),
        "received SIGINT"
    );
}
