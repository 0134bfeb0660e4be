// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{Result, RunwatchError};
use crate::exec::RunOptions;
use crate::types::CommandTemplate;
use crate::watch::ExcludeFilter;

impl TryFrom<RawSettings> for Settings {
    type Error = RunwatchError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        let template = validate_command(&raw)?;
        let root = validate_dir(&raw)?;
        let exclude = ExcludeFilter::new(&raw.exclude)
            .map_err(|e| RunwatchError::ConfigError(format!("{e:#}")))?;
        let spawn_attempts = validate_spawn_attempts(&raw)?;

        Ok(Settings::new_unchecked(
            root,
            template,
            raw.recursive,
            exclude,
            RunOptions {
                clear_screen: raw.clear,
                spawn_attempts,
            },
        ))
    }
}

fn validate_command(raw: &RawSettings) -> Result<CommandTemplate> {
    match raw.command.as_deref() {
        Some(line) => line.parse(),
        None => Err(RunwatchError::ConfigError(
            "a command line to run is required".to_string(),
        )),
    }
}

fn validate_dir(raw: &RawSettings) -> Result<std::path::PathBuf> {
    if !raw.dir.is_dir() {
        return Err(RunwatchError::ConfigError(format!(
            "{} is not a directory",
            raw.dir.display()
        )));
    }
    raw.dir.canonicalize().map_err(|e| {
        RunwatchError::ConfigError(format!("cannot resolve {}: {e}", raw.dir.display()))
    })
}

fn validate_spawn_attempts(raw: &RawSettings) -> Result<Option<u32>> {
    match raw.spawn_attempts {
        Some(0) => Err(RunwatchError::ConfigError(
            "spawn_attempts must be >= 1 (got 0)".to_string(),
        )),
        other => Ok(other),
    }
}
