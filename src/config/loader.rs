// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{FileSettings, RawSettings, Settings};
use crate::errors::Result;

/// Read a settings file. Only TOML deserialization happens here; see
/// [`load_settings`] for merging and validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<FileSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut file: FileSettings = toml::from_str(&contents)?;

    // `dir` in a file is relative to the file, not to the caller's cwd.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        file.dir = file
            .dir
            .map(|dir| if dir.is_relative() { parent.join(dir) } else { dir });
    }

    Ok(file)
}

/// Combine the command-line flags with an optional settings file.
///
/// Flags override file values; excludes from both are kept.
pub fn merge(file: FileSettings, args: &CliArgs) -> RawSettings {
    let defaults = RawSettings::default();

    let mut exclude = file.exclude;
    exclude.extend(args.exclude.iter().cloned());

    RawSettings {
        dir: args.dir.clone().or(file.dir).unwrap_or(defaults.dir),
        command: args.command.clone().or(file.command),
        recursive: args.recursive || file.recursive.unwrap_or(defaults.recursive),
        exclude,
        clear: !args.no_clear && file.clear.unwrap_or(defaults.clear),
        spawn_attempts: args.spawn_attempts.or(file.spawn_attempts),
    }
}

/// Build validated [`Settings`] from the command line (and the file it
/// points to, if any).
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => FileSettings::default(),
    };
    Settings::try_from(merge(file, args))
}
