//! Mtime-based freshness detection for build targets.
//!
//! A target is fresh when its modification time is strictly newer than its
//! source's. Content is never inspected, so a target touched by an unrelated
//! process (e.g. a VCS checkout) after its source counts as fresh.

use std::path::Path;
use std::time::SystemTime;

/// Check if the target at `target` can be skipped for a source last modified
/// at `source_mtime`.
///
/// Returns `false` whenever the target metadata cannot be read (missing file,
/// permission error, unsupported mtime): the caller must build it.
pub fn should_skip(source_mtime: SystemTime, target: &Path) -> bool {
    get_mtime(target).is_some_and(|target_mtime| target_mtime > source_mtime)
}

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
