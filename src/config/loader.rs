// src/config/loader.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{RawSupervisorConfig, SupervisorConfig};
use crate::errors::Result;

/// Map parsed CLI args onto a `RawSupervisorConfig`.
///
/// This performs no validation; use [`load_from_args`] for that. The root
/// falls back to the current working directory.
pub fn raw_from_args(args: &CliArgs) -> Result<RawSupervisorConfig> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };

    Ok(RawSupervisorConfig {
        root,
        program: args.program.clone(),
        args: args.command_args(),
        debounce: Duration::from_millis(args.debounce_ms),
        kill_grace: Duration::from_millis(args.kill_grace_ms),
        extensions: args.extensions.clone(),
        ignore: args.ignore.clone(),
        watch_new_dirs: args.watch_new_dirs,
    })
}

/// Build and validate the supervisor configuration from CLI args.
///
/// Relative roots are made absolute against the current directory so that
/// every path in the watch set is absolute.
pub fn load_from_args(args: &CliArgs) -> Result<SupervisorConfig> {
    let mut raw = raw_from_args(args)?;
    if raw.root.is_relative() {
        raw.root = absolute(raw.root)?;
    }
    SupervisorConfig::try_from(raw)
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(path))
}
