// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::exec::RunBackend;
use crate::types::ChangeEvent;

use super::core::{CoreDispatcher, DispatchStats};
use super::{CoreCommand, RuntimeEvent};

/// Drives the [`CoreDispatcher`] in response to `RuntimeEvent`s and hands
/// accepted changes to a `RunBackend`.
///
/// All dispatch semantics live in the core; this struct only reads the event
/// channel and carries out the commands the core returns.
pub struct Runtime<B: RunBackend> {
    core: CoreDispatcher,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
}

impl<B: RunBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: RunBackend> Runtime<B> {
    pub fn new(core: CoreDispatcher, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B) -> Self {
        Self {
            core,
            event_rx,
            backend,
        }
    }

    /// Main event loop.
    ///
    /// Returns the dispatch counters on shutdown, or the fatal error that
    /// aborted a run.
    pub async fn run(mut self) -> Result<DispatchStats> {
        info!("runwatch dispatcher started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "dispatcher received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("dispatcher stopping");
                break;
            }
        }

        let stats = self.core.stats();
        info!(
            runs = stats.runs_started,
            succeeded = stats.runs_succeeded,
            failed = stats.runs_failed,
            dropped = stats.events_dropped,
            "dispatcher exiting"
        );
        Ok(stats)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::StartRun(change) => self.start_run(change).await,
            CoreCommand::Abort(err) => {
                error!(error = %err, "run aborted");
                Err(err)
            }
        }
    }

    async fn start_run(&mut self, change: ChangeEvent) -> Result<()> {
        debug!(path = %change.path.display(), "starting run");
        self.backend.start_run(change).await
    }
}
