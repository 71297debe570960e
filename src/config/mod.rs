// src/config/mod.rs

//! Configuration for gomon.
//!
//! There is no config file: everything comes from the command line.
//! - `model.rs` defines the raw and validated configuration types.
//! - `loader.rs` assembles a raw config from parsed CLI args.
//! - `validate.rs` turns a raw config into a `SupervisorConfig`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_args, raw_from_args};
pub use model::{
    CommandSpec, IgnoreSpec, RawSupervisorConfig, SupervisorConfig, DEFAULT_DEBOUNCE,
    DEFAULT_EXTENSIONS, DEFAULT_IGNORED_DIRS, DEFAULT_KILL_GRACE, DEFAULT_PROGRAM, HIDDEN_PREFIX,
};
