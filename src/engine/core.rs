// src/engine/core.rs

//! Pure dispatcher state machine.
//!
//! [`CoreDispatcher`] consumes [`RuntimeEvent`]s and produces:
//! - an updated execution slot
//! - a list of commands describing what the IO shell should do next
//!
//! It has no channels, no Tokio types and performs no IO, so the
//! single-flight rules can be unit tested directly.

use crate::engine::RuntimeEvent;
use crate::engine::event_handlers::{
    CoreStep, handle_change, handle_run_aborted, handle_run_completed, handle_watch_error,
};

/// The single-run gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionSlot {
    #[default]
    Idle,
    Busy,
}

/// Counters kept by the dispatcher, reported when it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    pub runs_started: u64,
    pub runs_succeeded: u64,
    pub runs_failed: u64,
    pub events_dropped: u64,
    pub watch_errors: u64,
}

/// Dispatcher state: the execution slot and its counters.
#[derive(Debug, Default)]
pub struct CoreDispatcher {
    slot: ExecutionSlot,
    stats: DispatchStats,
}

impl CoreDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self) -> ExecutionSlot {
        self.slot
    }

    pub fn is_idle(&self) -> bool {
        self.slot == ExecutionSlot::Idle
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Handle a single event, updating state and returning the commands for
    /// the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ChangeDetected(change) => {
                handle_change(&mut self.slot, &mut self.stats, change)
            }
            RuntimeEvent::WatchError(message) => handle_watch_error(&mut self.stats, &message),
            RuntimeEvent::RunCompleted { outcome } => {
                handle_run_completed(&mut self.slot, &mut self.stats, &outcome)
            }
            RuntimeEvent::RunAborted { error } => handle_run_aborted(&mut self.slot, error),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use notify::EventKind;

    use crate::engine::CoreCommand;
    use crate::errors::RunwatchError;
    use crate::types::{ChangeEvent, RunOutcome};

    fn change(path: &str) -> RuntimeEvent {
        RuntimeEvent::ChangeDetected(ChangeEvent::new(path, EventKind::Any))
    }

    fn started(step: &CoreStep) -> Vec<&ChangeEvent> {
        step.commands
            .iter()
            .filter_map(|c| match c {
                CoreCommand::StartRun(ev) => Some(ev),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_idle() {
        let core = CoreDispatcher::new();
        assert_eq!(core.slot(), ExecutionSlot::Idle);
        assert_eq!(core.stats(), DispatchStats::default());
    }

    #[test]
    fn first_change_starts_a_run() {
        let mut core = CoreDispatcher::new();
        let step = core.step(change("/w/a.txt"));

        assert!(step.keep_running);
        let runs = started(&step);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].path.to_str(), Some("/w/a.txt"));
        assert_eq!(core.slot(), ExecutionSlot::Busy);
        assert_eq!(core.stats().runs_started, 1);
    }

    #[test]
    fn changes_while_busy_are_dropped() {
        let mut core = CoreDispatcher::new();
        core.step(change("/w/a.txt"));

        for path in ["/w/a.txt", "/w/b.txt", "/w/c.txt"] {
            let step = core.step(change(path));
            assert!(step.commands.is_empty());
            assert!(step.keep_running);
        }

        assert_eq!(core.slot(), ExecutionSlot::Busy);
        assert_eq!(core.stats().runs_started, 1);
        assert_eq!(core.stats().events_dropped, 3);
    }

    #[test]
    fn completion_frees_the_slot_for_the_next_change() {
        let mut core = CoreDispatcher::new();
        core.step(change("/w/a.txt"));
        core.step(RuntimeEvent::RunCompleted {
            outcome: RunOutcome::Success,
        });
        assert!(core.is_idle());

        let step = core.step(change("/w/a.txt"));
        assert_eq!(started(&step).len(), 1);
        assert_eq!(core.stats().runs_started, 2);
        assert_eq!(core.stats().runs_succeeded, 1);
    }

    #[test]
    fn failed_run_also_frees_the_slot() {
        let mut core = CoreDispatcher::new();
        core.step(change("/w/a.txt"));
        let step = core.step(RuntimeEvent::RunCompleted {
            outcome: RunOutcome::Failure("exit status: 1".into()),
        });

        assert!(step.keep_running);
        assert!(core.is_idle());
        assert_eq!(core.stats().runs_failed, 1);
    }

    #[test]
    fn stray_completion_while_idle_is_ignored() {
        let mut core = CoreDispatcher::new();
        let step = core.step(RuntimeEvent::RunCompleted {
            outcome: RunOutcome::Success,
        });
        assert!(step.commands.is_empty());
        assert!(core.is_idle());
        assert_eq!(core.stats().runs_succeeded, 0);
    }

    #[test]
    fn watch_errors_do_not_touch_the_slot() {
        let mut core = CoreDispatcher::new();
        let step = core.step(RuntimeEvent::WatchError("queue overflow".into()));
        assert!(step.keep_running);
        assert!(core.is_idle());

        core.step(change("/w/a.txt"));
        core.step(RuntimeEvent::WatchError("again".into()));
        assert_eq!(core.slot(), ExecutionSlot::Busy);
        assert_eq!(core.stats().watch_errors, 2);
    }

    #[test]
    fn abort_stops_the_loop_with_the_error() {
        let mut core = CoreDispatcher::new();
        core.step(change(""));
        let step = core.step(RuntimeEvent::RunAborted {
            error: RunwatchError::ConfigError("boom".into()),
        });

        assert!(!step.keep_running);
        assert!(matches!(
            step.commands.as_slice(),
            [CoreCommand::Abort(RunwatchError::ConfigError(_))]
        ));
    }

    #[test]
    fn shutdown_stops_the_loop() {
        let mut core = CoreDispatcher::new();
        let step = core.step(RuntimeEvent::ShutdownRequested);
        assert!(!step.keep_running);
        assert!(step.commands.is_empty());
    }
}
