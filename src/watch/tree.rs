// src/watch/tree.rs

//! Enumerating the directories to watch.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{GomonError, Result};
use crate::fs::{EntryKind, FileSystem};
use crate::watch::patterns::IgnoreRules;

/// Walk `root` depth-first and return every directory that should be
/// watched, in pre-order (parents before children, siblings sorted).
///
/// - Ignored directories are pruned: neither returned nor descended into.
/// - `root` itself is always returned.
/// - Symlinks are not followed.
///
/// Fails only if `root` cannot be listed. Unreadable directories further
/// down are logged and left out, together with their subtrees.
pub fn enumerate(fs: &dyn FileSystem, root: &Path, ignore: &IgnoreRules) -> Result<Vec<PathBuf>> {
    let children = fs.read_dir(root).map_err(|source| GomonError::Walk {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = vec![root.to_path_buf()];
    let mut stack: Vec<PathBuf> = Vec::new();
    push_subdirs(&mut stack, children, ignore);

    while let Some(dir) = stack.pop() {
        match fs.read_dir(&dir) {
            Ok(children) => {
                dirs.push(dir);
                push_subdirs(&mut stack, children, ignore);
            }
            Err(err) => {
                warn!(dir = ?dir, error = %err, "cannot read directory; skipping");
            }
        }
    }

    debug!(root = ?root, count = dirs.len(), "enumerated directories to watch");
    Ok(dirs)
}

/// Push the non-ignored subdirectories of one listing so that they pop off
/// the stack in sorted order.
fn push_subdirs(stack: &mut Vec<PathBuf>, entries: Vec<crate::fs::DirEntry>, ignore: &IgnoreRules) {
    let mut subdirs: Vec<PathBuf> = entries
        .into_iter()
        .filter(|e| e.kind == EntryKind::Dir)
        .map(|e| e.path)
        .filter(|p| {
            let skip = ignore.is_ignored_path(p);
            if skip {
                debug!(dir = ?p, "skipping ignored directory");
            }
            !skip
        })
        .collect();
    subdirs.sort();
    stack.extend(subdirs.into_iter().rev());
}
