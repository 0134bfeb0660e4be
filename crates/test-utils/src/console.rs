use std::sync::Mutex;

use runwatch::exec::Console;
use runwatch::types::{ResolvedCommand, RunOutcome};

/// One call made on a [`RecordingConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEntry {
    Clear,
    Announce(String),
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Outcome(RunOutcome),
}

/// A console that remembers everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    entries: Mutex<Vec<ConsoleEntry>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// All stdout chunks concatenated.
    pub fn stdout_text(&self) -> String {
        self.collect(|e| match e {
            ConsoleEntry::Stdout(b) => Some(b.as_slice()),
            _ => None,
        })
    }

    /// All stderr chunks concatenated.
    pub fn stderr_text(&self) -> String {
        self.collect(|e| match e {
            ConsoleEntry::Stderr(b) => Some(b.as_slice()),
            _ => None,
        })
    }

    pub fn announcements(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEntry::Announce(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn outcomes(&self) -> Vec<RunOutcome> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEntry::Outcome(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    fn collect(&self, pick: impl Fn(&ConsoleEntry) -> Option<&[u8]>) -> String {
        let entries = self.entries.lock().unwrap();
        let bytes: Vec<u8> = entries
            .iter()
            .filter_map(|e| pick(e))
            .flatten()
            .copied()
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn push(&self, entry: ConsoleEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl Console for RecordingConsole {
    fn clear(&self) {
        self.push(ConsoleEntry::Clear);
    }

    fn announce(&self, command: &ResolvedCommand) {
        self.push(ConsoleEntry::Announce(command.to_string()));
    }

    fn stdout(&self, chunk: &[u8]) {
        self.push(ConsoleEntry::Stdout(chunk.to_vec()));
    }

    fn stderr(&self, chunk: &[u8]) {
        self.push(ConsoleEntry::Stderr(chunk.to_vec()));
    }

    fn outcome(&self, outcome: &RunOutcome) {
        self.push(ConsoleEntry::Outcome(outcome.clone()));
    }
}
