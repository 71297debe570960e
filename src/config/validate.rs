// src/config/validate.rs

use std::time::Duration;

use globset::Glob;

use crate::config::model::{CommandSpec, IgnoreSpec, RawSupervisorConfig, SupervisorConfig};
use crate::errors::{GomonError, Result};

impl TryFrom<RawSupervisorConfig> for SupervisorConfig {
    type Error = GomonError;

    fn try_from(raw: RawSupervisorConfig) -> std::result::Result<Self, Self::Error> {
        validate_program(&raw.program)?;
        validate_durations(raw.debounce, raw.kill_grace)?;
        let extensions = normalize_extensions(&raw.extensions)?;
        let ignore = build_ignore_spec(&raw.ignore)?;

        if raw.root.as_os_str().is_empty() {
            return Err(GomonError::ConfigError(
                "watch root must not be empty".to_string(),
            ));
        }

        Ok(SupervisorConfig {
            root: raw.root,
            command: CommandSpec::new(raw.program, raw.args),
            debounce: raw.debounce,
            kill_grace: raw.kill_grace,
            extensions,
            ignore,
            watch_new_dirs: raw.watch_new_dirs,
        })
    }
}

fn validate_program(program: &str) -> Result<()> {
    if program.trim().is_empty() {
        return Err(GomonError::ConfigError(
            "program to supervise must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_durations(debounce: Duration, kill_grace: Duration) -> Result<()> {
    if debounce.is_zero() {
        return Err(GomonError::ConfigError(
            "debounce must be at least 1ms (got 0)".to_string(),
        ));
    }
    if kill_grace.is_zero() {
        return Err(GomonError::ConfigError(
            "kill grace must be at least 1ms (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Strip leading dots, drop duplicates, keep the user's order.
fn normalize_extensions(raw: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for ext in raw {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() || ext.contains('/') || ext.contains('\\') {
            return Err(GomonError::ConfigError(format!(
                "invalid extension '{}'",
                ext
            )));
        }
        if !out.iter().any(|e| e == ext) {
            out.push(ext.to_string());
        }
    }
    if out.is_empty() {
        return Err(GomonError::ConfigError(
            "at least one extension must be watched".to_string(),
        ));
    }
    Ok(out)
}

fn build_ignore_spec(extra: &[String]) -> Result<IgnoreSpec> {
    let mut spec = IgnoreSpec::default();
    for pattern in extra {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(GomonError::ConfigError(
                "ignore pattern must not be empty".to_string(),
            ));
        }
        // Patterns match a single path component.
        if pattern.contains('/') {
            return Err(GomonError::ConfigError(format!(
                "ignore pattern '{}' must be a directory name, not a path",
                pattern
            )));
        }
        Glob::new(pattern).map_err(|e| {
            GomonError::ConfigError(format!("invalid ignore pattern '{}': {}", pattern, e))
        })?;
        if !spec.patterns.iter().any(|p| p == pattern) {
            spec.patterns.push(pattern.to_string());
        }
    }
    Ok(spec)
}
