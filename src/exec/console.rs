// src/exec/console.rs

//! Operator-facing output surface.
//!
//! The run controller never writes to the terminal directly; it talks to a
//! [`Console`]. Production uses [`TerminalConsole`]; tests record what would
//! have been shown.

use std::io::{self, Write};

use owo_colors::{OwoColorize, Style};
use tracing::warn;

use crate::types::{ResolvedCommand, RunOutcome};

/// ANSI "cursor home + erase display".
pub const CLEAR_SEQUENCE: &str = "\x1b[H\x1b[2J";

/// Text printed for a successful run.
pub const SUCCESS_MESSAGE: &str = "Execution successful.";

/// Where the output of a run goes.
pub trait Console: Send + Sync {
    /// Wipe the screen before a new run.
    fn clear(&self);

    /// Announce the command that is about to be spawned.
    fn announce(&self, command: &ResolvedCommand);

    /// A chunk of the child's stdout, verbatim.
    fn stdout(&self, chunk: &[u8]);

    /// A chunk of the child's stderr.
    fn stderr(&self, chunk: &[u8]);

    /// The final one-line summary.
    fn outcome(&self, outcome: &RunOutcome);
}

/// Colored output on the process's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl TerminalConsole {
    fn write(&self, bytes: &[u8]) {
        let mut out = io::stdout().lock();
        if let Err(err) = out.write_all(bytes).and_then(|_| out.flush()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl Console for TerminalConsole {
    fn clear(&self) {
        self.write(CLEAR_SEQUENCE.as_bytes());
    }

    fn announce(&self, command: &ResolvedCommand) {
        let line = format!(
            "Running {} {}...\n",
            command.executable.yellow().bold(),
            command.args_line().magenta().bold()
        );
        self.write(line.as_bytes());
    }

    fn stdout(&self, chunk: &[u8]) {
        self.write(chunk);
    }

    fn stderr(&self, chunk: &[u8]) {
        self.write(&paint_bytes(Style::new().red().bold(), chunk));
    }

    fn outcome(&self, outcome: &RunOutcome) {
        let line = match outcome {
            RunOutcome::Success => format!("{}\n", SUCCESS_MESSAGE.green().bold()),
            RunOutcome::Failure(message) => format!("{}\n", message.red().bold()),
        };
        self.write(line.as_bytes());
    }
}

/// Wrap raw bytes in the ANSI codes of `style`.
///
/// The bytes are not decoded, so a multi-byte character split across two
/// chunks still comes out whole on the terminal.
fn paint_bytes(style: Style, chunk: &[u8]) -> Vec<u8> {
    let prefix = style.prefix_formatter().to_string();
    let suffix = style.suffix_formatter().to_string();
    let mut out = Vec::with_capacity(prefix.len() + chunk.len() + suffix.len());
    out.extend_from_slice(prefix.as_bytes());
    out.extend_from_slice(chunk);
    out.extend_from_slice(suffix.as_bytes());
    out
}
