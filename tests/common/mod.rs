#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::EventKind;
use runwatch::exec::{RunController, RunOptions};
use runwatch::types::ChangeEvent;
use runwatch_test_utils::RecordingConsole;

pub use runwatch_test_utils::{init_tracing, with_timeout};

/// Write an `sh` script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("writing test script");
    path
}

/// A change event with an unspecified kind.
pub fn change(path: impl Into<PathBuf>) -> ChangeEvent {
    ChangeEvent::new(path, EventKind::Any)
}

/// Controller for `command` that records into a fresh console.
pub fn recording_controller(
    command: &str,
    options: RunOptions,
) -> (RunController, Arc<RecordingConsole>) {
    let console = Arc::new(RecordingConsole::new());
    let template = command.parse().expect("valid command template");
    let controller = RunController::new(template, console.clone(), options);
    (controller, console)
}

/// Controller that runs `sh <script>`.
pub fn script_controller(script: &Path) -> (RunController, Arc<RecordingConsole>) {
    recording_controller(
        &format!("sh {}", script.display()),
        RunOptions::default(),
    )
}
