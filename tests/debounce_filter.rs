// tests/debounce_filter.rs

mod common;
use crate::common::builders::{change_at, modify_at};
use crate::common::{go_project, p};

use std::sync::Arc;
use std::time::{Duration, Instant};

use gomon::fs::mock::MockFileSystem;
use gomon::watch::{ChangeEvent, DebounceFilter, Operation, RelevanceRules, Verdict};

const THRESHOLD_MS: u64 = 100;

fn filter(fs: MockFileSystem, started_at: Instant) -> DebounceFilter {
    DebounceFilter::new(
        Duration::from_millis(THRESHOLD_MS),
        RelevanceRules::new(["go", "tmpl"]),
        Arc::new(fs),
        started_at,
    )
}

#[test]
fn relevant_change_after_window_restarts_and_arms_the_gate() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    let ev = modify_at(p("src/main.go"), base, THRESHOLD_MS);
    assert_eq!(f.should_act(&ev), Verdict::Restart);
    assert_eq!(f.state().last_action, ev.at);

    let again = modify_at(p("src/main.go"), base, THRESHOLD_MS + 99);
    assert_eq!(f.should_act(&again), Verdict::Suppressed);
    assert_eq!(f.state().last_action, ev.at);

    let later = modify_at(p("src/main.go"), base, 2 * THRESHOLD_MS);
    assert_eq!(f.should_act(&later), Verdict::Restart);
}

#[test]
fn nothing_is_accepted_right_after_startup() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    assert_eq!(f.should_act(&modify_at(p("main.go"), base, 10)), Verdict::Suppressed);
}

#[test]
fn irrelevant_extension_does_not_update_state() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    assert_eq!(
        f.should_act(&modify_at(p("README.md"), base, THRESHOLD_MS)),
        Verdict::Irrelevant
    );
    assert_eq!(f.state().last_action, base);

    // The gate is still open for a relevant change right after.
    assert_eq!(
        f.should_act(&modify_at(p("templates/index.tmpl"), base, THRESHOLD_MS + 1)),
        Verdict::Restart
    );
}

#[test]
fn extension_match_is_case_sensitive() {
    let base = Instant::now();
    let fs = go_project();
    fs.add_file(p("LOUD.GO"));
    let mut f = filter(fs, base);

    assert_eq!(
        f.should_act(&modify_at(p("LOUD.GO"), base, THRESHOLD_MS)),
        Verdict::Irrelevant
    );
}

#[test]
fn directory_changes_are_relevant() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    let at = Duration::from_millis(THRESHOLD_MS);
    let ev = change_at(p("src/handlers"), Operation::Create, base, at);
    assert_eq!(f.should_act(&ev), Verdict::Restart);
}

#[test]
fn vanished_path_arms_the_gate_without_restarting() {
    let base = Instant::now();
    let fs = go_project();
    fs.remove(p("src/main.go"));
    let mut f = filter(fs, base);

    let at = Duration::from_millis(THRESHOLD_MS);
    let gone = change_at(p("src/main.go"), Operation::Remove, base, at);
    assert_eq!(f.should_act(&gone), Verdict::Vanished);
    assert_eq!(f.state().last_action, gone.at);

    // The rest of the burst is absorbed.
    assert_eq!(
        f.should_act(&modify_at(p("main.go"), base, THRESHOLD_MS + 20)),
        Verdict::Suppressed
    );
}

#[test]
fn event_without_path_is_dropped() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    let ev = ChangeEvent::at(None, Operation::Modify, base + Duration::from_millis(THRESHOLD_MS));
    assert_eq!(f.should_act(&ev), Verdict::NoPath);
    assert_eq!(f.state().last_action, base);
}

#[test]
fn three_quick_events_collapse_into_one_restart() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    let verdicts: Vec<Verdict> = [0, 4, 9]
        .iter()
        .map(|ms| f.should_act(&modify_at(p("main.go"), base, THRESHOLD_MS + ms)))
        .collect();

    assert_eq!(
        verdicts,
        vec![Verdict::Restart, Verdict::Suppressed, Verdict::Suppressed]
    );
}

#[test]
fn out_of_order_timestamps_are_suppressed() {
    let base = Instant::now();
    let mut f = filter(go_project(), base);

    assert!(f.should_act(&modify_at(p("main.go"), base, 3 * THRESHOLD_MS)).is_restart());
    // Stamped before the last action: saturates to zero elapsed.
    assert_eq!(
        f.should_act(&modify_at(p("main.go"), base, THRESHOLD_MS)),
        Verdict::Suppressed
    );
}
