// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Program launched when `--program` is not given.
pub const DEFAULT_PROGRAM: &str = "go";

/// Directory names that are never watched, in addition to hidden ones.
///
/// These tend to hold thousands of directories and would quickly exhaust
/// the per-user watch limit.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", "vendor"];

/// Directories whose name starts with this marker are skipped.
pub const HIDDEN_PREFIX: char = '.';

/// Extensions (without the dot) whose changes cause a restart.
pub const DEFAULT_EXTENSIONS: &[&str] = &["go", "tmpl"];

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

/// The command the supervisor (re)starts: a program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Configuration as assembled from the command line, before validation.
///
/// Extensions and ignore patterns are kept exactly as the user typed them;
/// [`SupervisorConfig::try_from`] normalises and checks them.
#[derive(Debug, Clone)]
pub struct RawSupervisorConfig {
    pub root: PathBuf,
    pub program: String,
    pub args: Vec<String>,
    pub debounce: Duration,
    pub kill_grace: Duration,
    pub extensions: Vec<String>,
    /// Extra ignore patterns; the defaults are always applied.
    pub ignore: Vec<String>,
    pub watch_new_dirs: bool,
}

impl Default for RawSupervisorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            program: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
            kill_grace: DEFAULT_KILL_GRACE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignore: Vec::new(),
            watch_new_dirs: false,
        }
    }
}

/// Which directory names the tree walk skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSpec {
    /// Exact names or globs matched against a directory's base name.
    pub patterns: Vec<String>,
    pub hidden_prefix: char,
}

impl Default for IgnoreSpec {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            hidden_prefix: HIDDEN_PREFIX,
        }
    }
}

/// Validated configuration.
///
/// Construct it via `SupervisorConfig::try_from(raw)` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub root: PathBuf,
    pub command: CommandSpec,
    pub debounce: Duration,
    pub kill_grace: Duration,
    /// Normalised: no leading dot, deduplicated, never empty.
    pub extensions: Vec<String>,
    pub ignore: IgnoreSpec,
    pub watch_new_dirs: bool,
}
