// tests/debounce_property.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use proptest::prelude::*;

use gomon::fs::mock::MockFileSystem;
use gomon::watch::{ChangeEvent, DebounceFilter, Operation, RelevanceRules, Verdict};

fn project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/p/main.go");
    fs.add_file("/p/notes.md");
    fs.add_file("/p/views/page.tmpl");
    fs
}

// Candidate paths: relevant files, an irrelevant file, a directory and a
// path that does not exist.
fn path_strategy() -> impl Strategy<Value = PathBuf> {
    prop_oneof![
        Just(PathBuf::from("/p/main.go")),
        Just(PathBuf::from("/p/views/page.tmpl")),
        Just(PathBuf::from("/p/notes.md")),
        Just(PathBuf::from("/p/views")),
        Just(PathBuf::from("/p/gone.go")),
    ]
}

proptest! {
    #[test]
    fn accepted_events_are_at_least_threshold_apart(
        threshold_ms in 1u64..200,
        steps in proptest::collection::vec((0u64..120, path_strategy()), 1..60),
    ) {
        let base = Instant::now();
        let threshold = Duration::from_millis(threshold_ms);
        let mut filter = DebounceFilter::new(
            threshold,
            RelevanceRules::new(["go", "tmpl"]),
            Arc::new(project()),
            base,
        );

        let mut at = base;
        let mut accepted: Vec<Instant> = Vec::new();
        for (gap_ms, path) in steps {
            at += Duration::from_millis(gap_ms);
            let ev = ChangeEvent::at(Some(path), Operation::Modify, at);
            if filter.should_act(&ev) == Verdict::Restart {
                accepted.push(at);
            }
        }

        if let Some(first) = accepted.first() {
            prop_assert!(first.duration_since(base) >= threshold);
        }
        for pair in accepted.windows(2) {
            prop_assert!(pair[1].duration_since(pair[0]) >= threshold);
        }
    }
}
