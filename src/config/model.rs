// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::RunOptions;
use crate::types::CommandTemplate;
use crate::watch::ExcludeFilter;

/// Settings as read from an optional TOML file.
///
/// ```toml
/// dir = "src"
/// command = "cargo test"
/// recursive = true
/// exclude = ["target/**", "**/*.swp"]
/// clear = false
/// spawn_attempts = 10
/// ```
///
/// Every key is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    /// Directory to watch, relative to the file's own directory.
    pub dir: Option<PathBuf>,
    pub command: Option<String>,
    pub recursive: Option<bool>,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Clear the terminal before each run (default `true`).
    pub clear: Option<bool>,
    pub spawn_attempts: Option<u32>,
}

/// Flags and file merged, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSettings {
    pub dir: PathBuf,
    pub command: Option<String>,
    pub recursive: bool,
    pub exclude: Vec<String>,
    pub clear: bool,
    pub spawn_attempts: Option<u32>,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            command: None,
            recursive: false,
            exclude: Vec::new(),
            clear: true,
            spawn_attempts: None,
        }
    }
}

/// Validated settings the rest of the program runs on.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Canonical watch root.
    pub root: PathBuf,
    pub template: CommandTemplate,
    pub recursive: bool,
    pub exclude: ExcludeFilter,
    pub run: RunOptions,
}

impl Settings {
    pub(crate) fn new_unchecked(
        root: PathBuf,
        template: CommandTemplate,
        recursive: bool,
        exclude: ExcludeFilter,
        run: RunOptions,
    ) -> Self {
        Self {
            root,
            template,
            recursive,
            exclude,
            run,
        }
    }
}
