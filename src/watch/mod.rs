// src/watch/mod.rs

//! File watching.
//!
//! This module:
//! - wires up a cross-platform filesystem watcher (`notify`)
//! - turns its raw notifications into `ChangeEvent`s for the dispatcher
//! - drops changes matching the `--exclude` globs
//!
//! It knows nothing about runs or the execution slot.

pub mod event_handler;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_handler::translate_notify_result;
pub use patterns::ExcludeFilter;
pub use watcher::{WatcherHandle, spawn_watcher};
