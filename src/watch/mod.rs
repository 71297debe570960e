// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Enumerating the directories to watch, skipping ignored ones (`tree`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that turns OS
//!   notifications into [`ChangeEvent`]s (`source`).
//! - Deciding which of those events should restart the program
//!   (`debounce`, `patterns`).
//!
//! It does **not** know about processes; it only turns filesystem changes
//! into restart verdicts.

pub mod debounce;
pub mod event;
pub mod patterns;
pub mod source;
pub mod tree;

pub use debounce::{DebounceFilter, DebounceState, Verdict};
pub use event::{ChangeEvent, Operation};
pub use patterns::{IgnoreRules, RelevanceRules};
pub use source::{
    change_channel, register_all, ChangeSink, ChangeSource, ChangeStreams, NotifySource,
};
pub use tree::enumerate;
