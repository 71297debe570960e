// tests/tree_enumeration.rs

mod common;
use crate::common::{default_ignore, go_project, init_tracing, p, ROOT};

use std::error::Error;
use std::path::{Path, PathBuf};

use gomon::config::IgnoreSpec;
use gomon::errors::GomonError;
use gomon::fs::mock::MockFileSystem;
use gomon::fs::RealFileSystem;
use gomon::watch::{enumerate, IgnoreRules};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn skips_ignored_and_hidden_directories_with_their_subtrees() -> TestResult {
    init_tracing();
    let fs = go_project();

    let dirs = enumerate(&fs, Path::new(ROOT), &default_ignore())?;

    assert_eq!(
        dirs,
        vec![
            PathBuf::from(ROOT),
            p("src"),
            p("src/handlers"),
            p("templates"),
        ]
    );
    Ok(())
}

#[test]
fn root_is_included_even_if_its_name_is_ignored() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/work/.hidden/cmd/main.go");

    let root = Path::new("/work/.hidden");
    let dirs = enumerate(&fs, root, &default_ignore())?;

    assert_eq!(dirs, vec![root.to_path_buf(), root.join("cmd")]);
    Ok(())
}

#[test]
fn extra_glob_patterns_prune_matching_directories() -> TestResult {
    let fs = go_project();
    fs.add_dir(p("build-linux"));
    fs.add_dir(p("build-darwin/bin"));

    let mut spec = IgnoreSpec::default();
    spec.patterns.push("build-*".to_string());
    let ignore = IgnoreRules::new(&spec)?;

    let dirs = enumerate(&fs, Path::new(ROOT), &ignore)?;
    assert!(dirs.iter().all(|d| !d.to_string_lossy().contains("build-")));
    assert!(dirs.contains(&p("src/handlers")));
    Ok(())
}

#[test]
fn unreadable_root_is_an_error() {
    let fs = MockFileSystem::new();
    fs.add_unreadable_dir(p("locked"));

    let err = enumerate(&fs, &p("locked"), &default_ignore()).unwrap_err();
    assert!(matches!(err, GomonError::Walk { .. }), "got {err:?}");

    let err = enumerate(&fs, Path::new("/does/not/exist"), &default_ignore()).unwrap_err();
    assert!(matches!(err, GomonError::Walk { .. }), "got {err:?}");
}

#[test]
fn unreadable_subdirectory_is_skipped_and_walk_continues() -> TestResult {
    init_tracing();
    let fs = go_project();
    fs.add_unreadable_dir(p("secret"));

    let dirs = enumerate(&fs, Path::new(ROOT), &default_ignore())?;
    assert!(!dirs.contains(&p("secret")));
    assert!(dirs.contains(&p("templates")));
    Ok(())
}

#[test]
fn dot_entries_are_never_ignored() {
    let ignore = default_ignore();
    assert!(!ignore.is_ignored("."));
    assert!(!ignore.is_ignored(".."));
    assert!(ignore.is_ignored(".git"));
    assert!(ignore.is_ignored("vendor"));
    assert!(ignore.is_ignored("node_modules"));
    assert!(!ignore.is_ignored("vendored"));
}

#[test]
fn walks_a_real_directory_tree() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path();
    std::fs::create_dir_all(root.join("cmd/server"))?;
    std::fs::create_dir_all(root.join("vendor/github.com"))?;
    std::fs::create_dir_all(root.join(".idea"))?;
    std::fs::write(root.join("main.go"), "package main")?;

    let dirs = enumerate(&RealFileSystem, root, &default_ignore())?;
    assert_eq!(
        dirs,
        vec![root.to_path_buf(), root.join("cmd"), root.join("cmd/server")]
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path();
    std::fs::create_dir_all(root.join("pkg/inner"))?;
    std::os::unix::fs::symlink(root.join("pkg"), root.join("link"))?;

    let dirs = enumerate(&RealFileSystem, root, &default_ignore())?;
    assert!(!dirs.iter().any(|d| d.starts_with(root.join("link"))));
    assert!(dirs.contains(&root.join("pkg/inner")));
    Ok(())
}
