// src/watch/path_utils.rs

//! Path helpers for the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// A direct `strip_prefix(root)` is tried first. If that fails (symlinked
/// temp dirs, `/private/var` on macOS) both paths are canonicalized and the
/// strip is retried. Paths that have already been deleted cannot be
/// canonicalized, so for those only the parent is canonicalized.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_forward_slashes(rel));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok().or_else(|| {
        let parent = path.parent()?.canonicalize().ok()?;
        Some(parent.join(path.file_name()?))
    })?;

    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(to_forward_slashes)
}

fn to_forward_slashes(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
