// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `runwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runwatch",
    version,
    about = "Run a command every time a file in a directory changes.",
    long_about = "Run a command every time a file in a directory changes.\n\n\
                  Any argument containing %f is replaced with the absolute path \
                  of the file that changed. Changes arriving while the command \
                  is still running are ignored."
)]
pub struct CliArgs {
    /// Command line to run, as a single argument, e.g. "cargo test %f".
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Directory to watch.
    ///
    /// Default: the current directory.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Also watch subdirectories.
    #[arg(short, long)]
    pub recursive: bool,

    /// Ignore changes to paths (relative to DIR) matching this glob.
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Don't clear the terminal before each run.
    #[arg(long)]
    pub no_clear: bool,

    /// Try to start the command at most N times per run (1 = no retry).
    ///
    /// If omitted, spawning is retried until it succeeds.
    #[arg(long, value_name = "N")]
    pub spawn_attempts: Option<u32>,

    /// Optional TOML file with the same settings. Flags win over the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_a_single_positional() {
        let args = CliArgs::try_parse_from(["runwatch", "echo hello %f"]).unwrap();
        assert_eq!(args.command.as_deref(), Some("echo hello %f"));
        assert_eq!(args.dir, None);
        assert!(!args.recursive);
        assert!(!args.no_clear);
        assert!(args.exclude.is_empty());
        assert_eq!(args.spawn_attempts, None);
    }

    #[test]
    fn all_flags() {
        let args = CliArgs::try_parse_from([
            "runwatch",
            "-d",
            "src",
            "-r",
            "-e",
            "target/**",
            "--exclude",
            "*.swp",
            "--no-clear",
            "--spawn-attempts",
            "3",
            "--log-level",
            "debug",
            "make",
        ])
        .unwrap();

        assert_eq!(args.dir, Some(PathBuf::from("src")));
        assert!(args.recursive);
        assert_eq!(args.exclude, vec!["target/**", "*.swp"]);
        assert!(args.no_clear);
        assert_eq!(args.spawn_attempts, Some(3));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.command.as_deref(), Some("make"));
    }

    #[test]
    fn more_than_one_positional_is_rejected() {
        assert!(CliArgs::try_parse_from(["runwatch", "echo", "hello"]).is_err());
    }
}
