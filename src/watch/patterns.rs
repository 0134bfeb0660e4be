// src/watch/patterns.rs

//! Exclude patterns for the watcher.

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled `--exclude` globs.
///
/// Patterns are matched against paths relative to the watch root with
/// forward slashes, e.g. `"target/debug/foo"` or `"notes.txt.swp"`.
#[derive(Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl fmt::Debug for ExcludeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeFilter")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ExcludeFilter {
    /// Compile `patterns`. An empty list excludes nothing.
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let set = build_globset(patterns)
            .with_context(|| format!("compiling exclude patterns {patterns:?}"))?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set: Some(set),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_none()
    }

    /// Returns true if changes to `rel_path` should be ignored.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.set.as_ref().is_some_and(|set| set.is_match(rel_path))
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
