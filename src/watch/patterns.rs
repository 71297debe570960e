// src/watch/patterns.rs

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::IgnoreSpec;
use crate::errors::{GomonError, Result};

/// Compiled ignore predicate for directory names.
///
/// A directory is ignored when its base name matches one of the configured
/// names/globs, or starts with the hidden marker. The `.` and `..` pseudo
/// entries are never ignored.
#[derive(Clone)]
pub struct IgnoreRules {
    set: GlobSet,
    hidden_prefix: char,
}

impl fmt::Debug for IgnoreRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRules")
            .field("patterns", &self.set.len())
            .field("hidden_prefix", &self.hidden_prefix)
            .finish()
    }
}

impl IgnoreRules {
    pub fn new(spec: &IgnoreSpec) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &spec.patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                GomonError::ConfigError(format!("invalid ignore pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| GomonError::ConfigError(format!("building ignore set: {e}")))?;

        Ok(Self {
            set,
            hidden_prefix: spec.hidden_prefix,
        })
    }

    /// Whether a directory with this base name should be skipped.
    pub fn is_ignored(&self, name: &str) -> bool {
        if name == "." || name == ".." {
            return false;
        }
        name.starts_with(self.hidden_prefix) || self.set.is_match(name)
    }

    /// Same as [`is_ignored`](Self::is_ignored), using the path's base name.
    pub fn is_ignored_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| self.is_ignored(&n.to_string_lossy()))
            .unwrap_or(false)
    }
}

/// Which changed files are worth a restart.
#[derive(Debug, Clone)]
pub struct RelevanceRules {
    extensions: HashSet<String>,
}

impl RelevanceRules {
    /// `extensions` are given without the leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the file's extension is in the relevant set.
    ///
    /// Matching is case-sensitive: `main.GO` is not a Go source file.
    pub fn is_relevant_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(e))
            .unwrap_or(false)
    }
}
