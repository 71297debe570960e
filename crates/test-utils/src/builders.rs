#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use gomon::config::{RawSupervisorConfig, SupervisorConfig};
use gomon::watch::{ChangeEvent, Operation};

/// Builder for `SupervisorConfig` to simplify test setup.
pub struct ConfigBuilder {
    config: RawSupervisorConfig,
}

impl ConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: RawSupervisorConfig {
                root: root.into(),
                ..RawSupervisorConfig::default()
            },
        }
    }

    pub fn program(mut self, program: &str) -> Self {
        self.config.program = program.to_string();
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.config.args.push(arg.to_string());
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce = Duration::from_millis(ms);
        self
    }

    pub fn kill_grace_ms(mut self, ms: u64) -> Self {
        self.config.kill_grace = Duration::from_millis(ms);
        self
    }

    /// Replace the default extensions.
    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.config.extensions = exts.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.config.ignore.push(pattern.to_string());
        self
    }

    pub fn watch_new_dirs(mut self, val: bool) -> Self {
        self.config.watch_new_dirs = val;
        self
    }

    pub fn raw(self) -> RawSupervisorConfig {
        self.config
    }

    pub fn build(self) -> SupervisorConfig {
        SupervisorConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Change event for `path`, stamped `offset` after `base`.
pub fn change_at(
    path: impl AsRef<Path>,
    op: Operation,
    base: Instant,
    offset: Duration,
) -> ChangeEvent {
    ChangeEvent::at(Some(path.as_ref().to_path_buf()), op, base + offset)
}

/// Shorthand for a `Modify` event `offset_ms` after `base`.
pub fn modify_at(path: impl AsRef<Path>, base: Instant, offset_ms: u64) -> ChangeEvent {
    change_at(path, Operation::Modify, base, Duration::from_millis(offset_ms))
}
