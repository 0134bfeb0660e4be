// src/engine/event_handlers.rs

//! Event handling logic for the core dispatcher.

use tracing::{debug, error, warn};

use crate::engine::core::{DispatchStats, ExecutionSlot};
use crate::errors::RunwatchError;
use crate::types::{ChangeEvent, RunOutcome};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug)]
pub enum CoreCommand {
    /// Hand this change to the run backend.
    StartRun(ChangeEvent),
    /// Stop the process with this error.
    Abort(RunwatchError),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }
}

/// Handle a file change.
///
/// Idle: claim the slot and start a run. Busy: drop the change. There is no
/// queue, so a change to a different file during a run is lost as well.
pub fn handle_change(
    slot: &mut ExecutionSlot,
    stats: &mut DispatchStats,
    change: ChangeEvent,
) -> CoreStep {
    match *slot {
        ExecutionSlot::Idle => {
            *slot = ExecutionSlot::Busy;
            stats.runs_started += 1;
            CoreStep {
                commands: vec![CoreCommand::StartRun(change)],
                keep_running: true,
            }
        }
        ExecutionSlot::Busy => {
            stats.events_dropped += 1;
            debug!(path = %change.path.display(), "run in progress; dropping change");
            CoreStep::idle()
        }
    }
}

/// Handle the end of the active run.
pub fn handle_run_completed(
    slot: &mut ExecutionSlot,
    stats: &mut DispatchStats,
    outcome: &RunOutcome,
) -> CoreStep {
    if *slot == ExecutionSlot::Idle {
        warn!(?outcome, "run completion received while idle; ignoring");
        return CoreStep::idle();
    }

    *slot = ExecutionSlot::Idle;
    match outcome {
        RunOutcome::Success => stats.runs_succeeded += 1,
        RunOutcome::Failure(_) => stats.runs_failed += 1,
    }
    CoreStep::idle()
}

/// Watcher errors are reported and otherwise ignored.
pub fn handle_watch_error(stats: &mut DispatchStats, message: &str) -> CoreStep {
    stats.watch_errors += 1;
    error!(error = %message, "file watch error");
    CoreStep::idle()
}

/// The active run could not even be prepared; nothing sensible can follow.
pub fn handle_run_aborted(slot: &mut ExecutionSlot, error: RunwatchError) -> CoreStep {
    *slot = ExecutionSlot::Idle;
    CoreStep {
        commands: vec![CoreCommand::Abort(error)],
        keep_running: false,
    }
}
