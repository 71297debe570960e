// src/watch/debounce.rs

//! Debounce filter: decides which raw change events are worth a restart.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::fs::{EntryKind, FileSystem};
use crate::watch::event::ChangeEvent;
use crate::watch::patterns::RelevanceRules;

/// Result of running one event through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Relevant change outside the cool-down window: restart.
    Restart,
    /// Arrived less than `threshold` after the last action.
    Suppressed,
    /// The event did not name a path.
    NoPath,
    /// The path was gone by the time we looked. Still arms the cool-down so
    /// the rest of a delete burst is absorbed.
    Vanished,
    /// Exists, but is a file with an extension we don't care about.
    Irrelevant,
}

impl Verdict {
    pub fn is_restart(self) -> bool {
        self == Verdict::Restart
    }
}

/// Mutable state of the filter: when we last acted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceState {
    pub last_action: Instant,
}

/// Minimum-interval gate plus relevance predicate.
///
/// The gate re-arms only `threshold` after the last *accepted* event, so a
/// burst of notifications from a single save collapses into one restart as
/// long as the burst is shorter than the threshold. All operations are
/// treated alike.
pub struct DebounceFilter {
    threshold: Duration,
    relevance: RelevanceRules,
    fs: Arc<dyn FileSystem>,
    state: DebounceState,
}

impl fmt::Debug for DebounceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceFilter")
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DebounceFilter {
    /// `started_at` seeds `last_action`, so nothing is accepted during the
    /// first `threshold` after startup (the initial launch already covers it).
    pub fn new(
        threshold: Duration,
        relevance: RelevanceRules,
        fs: Arc<dyn FileSystem>,
        started_at: Instant,
    ) -> Self {
        Self {
            threshold,
            relevance,
            fs,
            state: DebounceState {
                last_action: started_at,
            },
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Classify `event`, updating `last_action` on `Restart` and `Vanished`.
    ///
    /// `event.at` is used as "now".
    pub fn should_act(&mut self, event: &ChangeEvent) -> Verdict {
        let now = event.at;

        if now.saturating_duration_since(self.state.last_action) < self.threshold {
            trace!(path = ?event.path, "within debounce window; ignoring");
            return Verdict::Suppressed;
        }

        let Some(path) = event.path.as_deref() else {
            return Verdict::NoPath;
        };

        let kind = match self.fs.kind(path) {
            Ok(kind) => kind,
            Err(err) => {
                debug!(path = ?path, error = %err, "changed path no longer accessible");
                self.state.last_action = now;
                return Verdict::Vanished;
            }
        };

        let relevant = match kind {
            EntryKind::Dir => true,
            _ => self.relevance.is_relevant_file(path),
        };

        if !relevant {
            trace!(path = ?path, "irrelevant change");
            return Verdict::Irrelevant;
        }

        self.state.last_action = now;
        Verdict::Restart
    }
}
