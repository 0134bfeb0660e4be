// src/types.rs

//! Value types shared by the watcher, the dispatcher and the run controller.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use notify::EventKind;

use crate::errors::RunwatchError;

/// Placeholder replaced by the absolute path of the triggering file.
pub const PATH_PLACEHOLDER: &str = "%f";

/// A single filesystem change as seen by the dispatcher.
///
/// `kind` is carried for logging only; the dispatcher and the run controller
/// never branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: EventKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// The user's command line, split once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub executable: String,
    pub argv: Vec<String>,
}

impl FromStr for CommandTemplate {
    type Err = RunwatchError;

    /// Split on runs of whitespace. No quoting is understood.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().map(str::to_string);
        let executable = tokens.next().ok_or_else(|| {
            RunwatchError::ConfigError("command line must not be empty".to_string())
        })?;
        Ok(Self {
            executable,
            argv: tokens.collect(),
        })
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable)?;
        for arg in &self.argv {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A template with the placeholder substituted for one event.
///
/// Arguments are OS strings: a trigger path that is not valid UTF-8 reaches
/// the child byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub executable: String,
    pub argv: Vec<OsString>,
}

impl ResolvedCommand {
    /// Arguments joined with single spaces, as shown in the announcement.
    /// Invalid UTF-8 is replaced here and only here.
    pub fn args_line(&self) -> String {
        self.argv
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.argv.is_empty() {
            write!(f, "{}", self.executable)
        } else {
            write!(f, "{} {}", self.executable, self.args_line())
        }
    }
}

/// Result of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// Carries the error text reported to the operator.
    Failure(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}
