// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`interpolate`] turns the command template plus a changed path into the
//!   concrete command line.
//! - [`drain`] forwards one child pipe into a channel.
//! - [`run_controller`] owns a single run: announce, spawn, stream, wait,
//!   report.
//! - [`console`] is the output surface the controller writes to.
//! - [`backend`] provides the `RunBackend` trait the dispatcher uses, with
//!   the production `RealRunBackend`.

pub mod backend;
pub mod console;
pub mod drain;
pub mod interpolate;
pub mod run_controller;

pub use backend::{RealRunBackend, RunBackend};
pub use console::{Console, TerminalConsole};
pub use interpolate::interpolate;
pub use run_controller::{RunController, RunOptions};
