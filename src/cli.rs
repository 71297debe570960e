// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The surface mirrors the toolchain being supervised:
//!
//! ```text
//! gomon [OPTIONS] <SUBCOMMAND> <FILE> [ARGS]...
//! gomon run main.go --port 8080
//! ```
//!
//! Options must come before `<SUBCOMMAND>`; everything from the subcommand
//! onwards is handed to the program verbatim.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gomon`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gomon",
    version,
    about = "Restart a command whenever the project's source files change.",
    long_about = None
)]
pub struct CliArgs {
    /// The program's subcommand, entry file and remaining arguments, e.g.
    /// `run main.go --port 8080`.
    ///
    /// Everything from the subcommand onwards is taken verbatim, including
    /// words that look like gomon's own options (`--root`, `-h`, ...).
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 2..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,

    /// Program to supervise.
    #[arg(long, value_name = "PROG", default_value = "go")]
    pub program: String,

    /// Project root to watch.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Minimum time between two restarts, in milliseconds.
    #[arg(long = "debounce", value_name = "MILLIS", default_value_t = 500)]
    pub debounce_ms: u64,

    /// How long a stopped process may take to exit before it is killed
    /// forcefully, in milliseconds.
    #[arg(long = "kill-grace", value_name = "MILLIS", default_value_t = 5000)]
    pub kill_grace_ms: u64,

    /// File extension that triggers a restart (repeatable).
    #[arg(long = "ext", value_name = "EXT", default_values = ["go", "tmpl"])]
    pub extensions: Vec<String>,

    /// Extra directory name or glob to skip while watching (repeatable).
    ///
    /// `node_modules`, `vendor` and hidden directories are always skipped.
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Also watch directories created after startup.
    #[arg(long)]
    pub watch_new_dirs: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GOMON_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// Subcommand for the program, e.g. `run`.
    pub fn subcommand(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Entry file passed after the subcommand, e.g. `main.go`.
    pub fn file(&self) -> &str {
        self.command.get(1).map(String::as_str).unwrap_or_default()
    }

    /// Arguments for the supervised program: `[subcommand, file, args...]`.
    pub fn command_args(&self) -> Vec<String> {
        self.command.clone()
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
