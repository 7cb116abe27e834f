//! Source tree walking.
//!
//! One pass over the source root produces immutable [`SourceEntry`]
//! snapshots. Nothing is re-stat'ed later in the build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use jwalk::{Parallelism, WalkDir};

use crate::core::BuildError;

/// Kind of walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// Snapshot of one entry under the source root, taken at walk time.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Absolute path of the entry
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Modification time; `UNIX_EPOCH` when the platform cannot report it
    pub modified: SystemTime,
}

impl SourceEntry {
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Entries of a source tree, split by kind.
#[derive(Debug, Default)]
pub struct SourceTree {
    pub dirs: Vec<SourceEntry>,
    pub files: Vec<SourceEntry>,
}

impl SourceTree {
    /// Split walked entries into directories and files.
    pub fn partition(entries: Vec<SourceEntry>) -> Self {
        let (dirs, files) = entries.into_iter().partition(SourceEntry::is_dir);
        Self { dirs, files }
    }
}

/// Walk every entry under `root` (hidden entries included, root excluded).
///
/// Fails if the root, or any entry below it, cannot be read. Symlinks are not
/// followed; entries that are neither directories nor regular files are
/// left out.
///
/// The walk stays on the calling thread. It runs inside a rayon worker
/// while the bundler may hold the others, and jwalk's pooled reads give up
/// when no worker is free.
pub fn scan_tree(root: &Path) -> Result<SourceTree, BuildError> {
    let walk_err = |e: io::Error| BuildError::Walk(root.to_path_buf(), e);

    let meta = fs::metadata(root).map_err(walk_err)?;
    if !meta.is_dir() {
        return Err(walk_err(io::Error::other("not a directory")));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .min_depth(1)
    {
        let entry = entry.map_err(|e| walk_err(e.into()))?;
        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            crate::debug!("mirror"; "skipping {}", entry.path().display());
            continue;
        };

        let metadata = entry.metadata().map_err(|e| walk_err(e.into()))?;
        entries.push(SourceEntry {
            path: entry.path(),
            kind,
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    Ok(SourceTree::partition(entries))
}
