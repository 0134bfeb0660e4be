// src/watch/event_handler.rs

//! Conversion of raw `notify` results into dispatcher events.

use std::path::Path;

use notify::{Event, EventKind};
use tracing::{debug, trace};

use crate::engine::RuntimeEvent;
use crate::types::ChangeEvent;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::ExcludeFilter;

/// Turn one notify result into zero or more runtime events.
///
/// - Access events (a file was opened or read) are not changes and yield
///   nothing.
/// - Each path of an event becomes its own `ChangeDetected`, carrying the
///   event kind.
/// - Paths matching the exclude filter are skipped.
/// - Errors become a single `WatchError`.
pub fn translate_notify_result(
    root: &Path,
    res: notify::Result<Event>,
    exclude: &ExcludeFilter,
) -> Vec<RuntimeEvent> {
    let event = match res {
        Ok(event) => event,
        Err(err) => return vec![RuntimeEvent::WatchError(err.to_string())],
    };

    trace!(?event, "received notify event");

    if matches!(event.kind, EventKind::Access(_)) {
        return Vec::new();
    }

    let kind = event.kind;
    event
        .paths
        .into_iter()
        .filter(|path| !is_excluded(root, path, exclude))
        .map(|path| RuntimeEvent::ChangeDetected(ChangeEvent::new(path, kind)))
        .collect()
}

fn is_excluded(root: &Path, path: &Path, exclude: &ExcludeFilter) -> bool {
    if exclude.is_empty() {
        return false;
    }
    match relative_str(root, path) {
        Some(rel) if exclude.is_excluded(&rel) => {
            debug!(path = %rel, "change matches exclude pattern; ignoring");
            true
        }
        Some(_) => false,
        // Outside the root: nothing to match against, let it through.
        None => false,
    }
}
