// src/config/mod.rs

//! Configuration for runwatch.
//!
//! Responsibilities:
//! - Define the optional TOML file model and the merged settings (`model.rs`).
//! - Load the file and merge it with command-line flags (`loader.rs`).
//! - Validate command, directory, globs and retry bound (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_settings, merge};
pub use model::{FileSettings, RawSettings, Settings};
