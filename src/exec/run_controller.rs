// src/exec/run_controller.rs

//! One command execution, end to end.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::console::Console;
use crate::exec::drain::{StreamName, drain};
use crate::exec::interpolate::interpolate;
use crate::types::{ChangeEvent, CommandTemplate, ResolvedCommand, RunOutcome};

/// Buffered chunks per output channel.
const OUTPUT_CHANNEL_CAPACITY: usize = 32;

/// Knobs for a run that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Send the clear sequence before announcing a run.
    pub clear_screen: bool,
    /// Give up spawning after this many failed attempts. `None` retries
    /// forever.
    pub spawn_attempts: Option<u32>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            clear_screen: true,
            spawn_attempts: None,
        }
    }
}

/// Runs the configured command for one change event.
///
/// The controller is shared (`Arc`) between runs; all per-run state lives on
/// the stack of [`RunController::run`].
pub struct RunController {
    template: CommandTemplate,
    console: Arc<dyn Console>,
    options: RunOptions,
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("template", &self.template)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RunController {
    pub fn new(template: CommandTemplate, console: Arc<dyn Console>, options: RunOptions) -> Self {
        Self {
            template,
            console,
            options,
        }
    }

    /// Execute the command for `event` and report the outcome on the console.
    ///
    /// Only a failure to resolve `%f` is returned as an error; everything that
    /// goes wrong with the child itself ends up in the [`RunOutcome`].
    pub async fn run(&self, event: &ChangeEvent) -> Result<RunOutcome> {
        let command = interpolate(&self.template, &event.path)?;

        if self.options.clear_screen {
            self.console.clear();
        }
        self.console.announce(&command);
        info!(
            path = %event.path.display(),
            kind = ?event.kind,
            command = %command,
            "running command"
        );

        let outcome = match self.spawn(&command).await {
            Ok(mut child) => {
                self.stream_output(&mut child).await;
                match child.wait().await {
                    Ok(status) if status.success() => RunOutcome::Success,
                    Ok(status) => RunOutcome::Failure(status.to_string()),
                    Err(err) => RunOutcome::Failure(err.to_string()),
                }
            }
            Err(message) => RunOutcome::Failure(message),
        };

        info!(command = %command, success = outcome.is_success(), "command finished");
        self.console.outcome(&outcome);
        Ok(outcome)
    }

    /// Spawn `command`, retrying immediately on failure.
    ///
    /// Without a configured attempt bound this loops until the OS lets the
    /// spawn through. With a bound, the last error is returned as text.
    async fn spawn(&self, command: &ResolvedCommand) -> std::result::Result<Child, String> {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);

            let spawned = Command::new(&command.executable)
                .args(&command.argv)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn();

            let err = match spawned {
                Ok(child) => {
                    debug!(attempt, pid = ?child.id(), "command spawned");
                    return Ok(child);
                }
                Err(err) => err,
            };

            if let Some(max) = self.options.spawn_attempts {
                if attempt >= max {
                    warn!(
                        attempt,
                        executable = %command.executable,
                        error = %err,
                        "giving up spawning command"
                    );
                    return Err(format!("failed to start {}: {err}", command.executable));
                }
            }

            warn!(
                attempt,
                executable = %command.executable,
                error = %err,
                "failed to spawn command; retrying"
            );
            tokio::task::yield_now().await;
        }
    }

    /// Forward the child's stdout/stderr to the console until stdout closes.
    ///
    /// Stderr completion alone does not end streaming. Once stdout is done,
    /// stderr chunks already delivered are still shown but nothing more is
    /// waited for.
    async fn stream_output(&self, child: &mut Child) {
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            warn!("child pipes were not captured; skipping output");
            return;
        };

        let (out_tx, mut out_rx) = mpsc::channel::<Vec<u8>>(OUTPUT_CHANNEL_CAPACITY);
        let (err_tx, mut err_rx) = mpsc::channel::<Vec<u8>>(OUTPUT_CHANNEL_CAPACITY);
        let (out_done_tx, mut out_done_rx) = oneshot::channel::<()>();
        let (err_done_tx, mut err_done_rx) = oneshot::channel::<()>();

        tokio::spawn(drain(StreamName::Stdout, stdout, out_tx, out_done_tx));
        tokio::spawn(drain(StreamName::Stderr, stderr, err_tx, err_done_tx));

        let mut err_done = false;
        loop {
            tokio::select! {
                Some(chunk) = out_rx.recv() => self.console.stdout(&chunk),
                Some(chunk) = err_rx.recv() => self.console.stderr(&chunk),
                _ = &mut err_done_rx, if !err_done => {
                    debug!("stderr closed");
                    err_done = true;
                }
                _ = &mut out_done_rx => {
                    debug!("stdout closed");
                    break;
                }
            }
        }

        // The stdout drainer has finished, so this ends as soon as the
        // buffered chunks are consumed.
        while let Some(chunk) = out_rx.recv().await {
            self.console.stdout(&chunk);
        }
        while let Ok(chunk) = err_rx.try_recv() {
            self.console.stderr(&chunk);
        }
    }
}
