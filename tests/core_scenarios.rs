// tests/core_scenarios.rs

mod common;
use crate::common::builders::{change_at, modify_at};
use crate::common::{default_ignore, go_project, init_tracing, p};

use std::sync::Arc;
use std::time::{Duration, Instant};

use gomon::engine::{CoreCommand, CoreRuntime, RuntimeEvent, RuntimeOptions, ShutdownReason};
use gomon::fs::mock::MockFileSystem;
use gomon::fs::FileSystem;
use gomon::watch::{DebounceFilter, Operation, RelevanceRules};

const THRESHOLD_MS: u64 = 100;

fn core(fs: MockFileSystem, started_at: Instant, options: RuntimeOptions) -> CoreRuntime {
    let fs: Arc<dyn FileSystem> = Arc::new(fs);
    let filter = DebounceFilter::new(
        Duration::from_millis(THRESHOLD_MS),
        RelevanceRules::new(["go", "tmpl"]),
        Arc::clone(&fs),
        started_at,
    );
    CoreRuntime::new(filter, default_ignore(), fs, options)
}

fn restarts(commands: &[CoreCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, CoreCommand::Restart(_)))
        .count()
}

#[test]
fn markdown_change_does_not_restart_but_go_change_does() {
    init_tracing();
    let base = Instant::now();
    let mut core = core(go_project(), base, RuntimeOptions::default());

    let step = core.step(RuntimeEvent::Change(modify_at(p("README.md"), base, THRESHOLD_MS)));
    assert!(step.keep_running);
    assert!(step.commands.is_empty());

    let ev = modify_at(p("src/main.go"), base, THRESHOLD_MS + 5);
    let step = core.step(RuntimeEvent::Change(ev.clone()));
    assert_eq!(step.commands, vec![CoreCommand::Restart(ev)]);
}

#[test]
fn burst_of_three_writes_restarts_once() {
    let base = Instant::now();
    let mut core = core(go_project(), base, RuntimeOptions::default());

    let mut total = 0;
    for ms in [0, 3, 9] {
        let step = core.step(RuntimeEvent::Change(modify_at(
            p("main.go"),
            base,
            THRESHOLD_MS + ms,
        )));
        total += restarts(&step.commands);
    }
    assert_eq!(total, 1);
}

#[test]
fn source_errors_are_not_fatal() {
    let base = Instant::now();
    let mut core = core(go_project(), base, RuntimeOptions::default());

    let step = core.step(RuntimeEvent::SourceError("queue overflow".to_string()));
    assert!(step.keep_running);
    assert!(step.commands.is_empty());
}

#[test]
fn shutdown_request_stops_the_loop_and_drops_later_events() {
    let base = Instant::now();
    let mut core = core(go_project(), base, RuntimeOptions::default());

    let reason = ShutdownReason::Signal("SIGTERM".to_string());
    let step = core.step(RuntimeEvent::ShutdownRequested(reason.clone()));
    assert!(!step.keep_running);
    assert_eq!(step.commands, vec![CoreCommand::Shutdown(reason)]);
    assert!(core.is_shutting_down());

    let step = core.step(RuntimeEvent::Change(modify_at(p("main.go"), base, 10 * THRESHOLD_MS)));
    assert!(!step.keep_running);
    assert!(step.commands.is_empty());

    let step = core.step(RuntimeEvent::ShutdownRequested(ShutdownReason::Fault("late".into())));
    assert!(step.commands.is_empty());
}

#[test]
fn new_directories_are_registered_when_enabled() {
    let base = Instant::now();
    let fs = go_project();
    fs.add_dir(p("api/v1"));
    fs.add_dir(p("api/.cache"));
    fs.add_dir(p(".tmp"));
    let mut core = core(fs, base, RuntimeOptions { watch_new_dirs: true });

    let created = change_at(p("api"), Operation::Create, base, Duration::from_millis(THRESHOLD_MS));
    let step = core.step(RuntimeEvent::Change(created.clone()));
    assert_eq!(
        step.commands,
        vec![
            CoreCommand::WatchDirs(vec![p("api"), p("api/v1")]),
            CoreCommand::Restart(created),
        ]
    );

    // Hidden directories are not registered, even inside the debounce window.
    let later = Duration::from_millis(THRESHOLD_MS + 1);
    let hidden = change_at(p(".tmp"), Operation::Create, base, later);
    let step = core.step(RuntimeEvent::Change(hidden));
    assert!(step.commands.is_empty());
}

#[test]
fn new_directories_are_ignored_by_default() {
    let base = Instant::now();
    let fs = go_project();
    fs.add_dir(p("api"));
    let mut core = core(fs, base, RuntimeOptions::default());

    let created = change_at(p("api"), Operation::Create, base, Duration::from_millis(THRESHOLD_MS));
    let step = core.step(RuntimeEvent::Change(created.clone()));
    assert_eq!(step.commands, vec![CoreCommand::Restart(created)]);
}
