#![allow(dead_code)]

pub use gomon_test_utils::builders;
pub use gomon_test_utils::init_tracing;

use std::path::PathBuf;

use gomon::config::IgnoreSpec;
use gomon::fs::mock::MockFileSystem;
use gomon::watch::IgnoreRules;

pub const ROOT: &str = "/proj";

pub fn p(rel: &str) -> PathBuf {
    PathBuf::from(ROOT).join(rel)
}

pub fn default_ignore() -> IgnoreRules {
    IgnoreRules::new(&IgnoreSpec::default()).expect("default ignore rules compile")
}

/// A small Go project:
///
/// ```text
/// /proj
/// ├── .git/objects/
/// ├── main.go
/// ├── README.md
/// ├── node_modules/pkg/
/// ├── src/main.go
/// ├── src/handlers/user.go
/// ├── templates/index.tmpl
/// └── vendor/x.go
/// ```
pub fn go_project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file(p("main.go"));
    fs.add_file(p("README.md"));
    fs.add_file(p(".git/objects/ab"));
    fs.add_file(p("node_modules/pkg/index.js"));
    fs.add_file(p("src/main.go"));
    fs.add_file(p("src/handlers/user.go"));
    fs.add_file(p("templates/index.tmpl"));
    fs.add_file(p("vendor/x.go"));
    fs
}
