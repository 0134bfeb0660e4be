// src/engine/mod.rs

//! Event dispatch for runwatch.
//!
//! The dispatcher reacts to:
//! - file changes from the watcher
//! - watcher errors
//! - run completions (or fatal aborts) from the run backend
//! - shutdown signals
//!
//! and makes sure at most one run is ever in flight. Changes that arrive
//! while a run is active are dropped, not queued.
//!
//! The pure state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::errors::RunwatchError;
use crate::types::{ChangeEvent, RunOutcome};

/// Events flowing into the dispatcher from the watcher and the run backend.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A watched path changed.
    ChangeDetected(ChangeEvent),
    /// The watcher reported an error; logged and otherwise ignored.
    WatchError(String),
    /// The active run finished, successfully or not.
    RunCompleted { outcome: RunOutcome },
    /// The active run hit an unrecoverable error; the process must stop.
    RunAborted { error: RunwatchError },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use self::core::{CoreDispatcher, DispatchStats, ExecutionSlot};
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
