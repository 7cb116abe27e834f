//! Directory mirroring: the whole-tree pass.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::entry::scan_tree;
use super::kind::SourceKind;
use super::materialize::{Materializer, Outcome};
use super::route::TreeRoute;
use crate::core::BuildError;
use crate::debug;
use crate::logger::ProgressLine;
use crate::utils::plural::plural_count;

/// Counts from one mirroring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Directories ensured under the target root
    pub dirs: usize,
    pub transpiled: usize,
    pub copied: usize,
    /// Files whose target was already fresh
    pub skipped: usize,
}

impl MirrorStats {
    /// Files written this pass.
    pub fn written(&self) -> usize {
        self.transpiled + self.copied
    }
}

#[derive(Default)]
struct Counters {
    transpiled: AtomicUsize,
    copied: AtomicUsize,
    skipped: AtomicUsize,
}

impl Counters {
    fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Skipped(_) => &self.skipped,
            Outcome::Transpiled => &self.transpiled,
            Outcome::Copied => &self.copied,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn into_stats(self, dirs: usize) -> MirrorStats {
        MirrorStats {
            dirs,
            transpiled: self.transpiled.into_inner(),
            copied: self.copied.into_inner(),
            skipped: self.skipped.into_inner(),
        }
    }
}

/// Mirror the source tree of `route` onto its target tree.
///
/// 1. Walk the source root once.
/// 2. Ensure every target directory exists. All of them are created before
///    any file is touched, so empty directories are mirrored too.
/// 3. Materialize all files concurrently on the current rayon pool.
///
/// The first failing file fails the pass. Files already written stay on disk.
pub fn mirror_tree(
    route: &TreeRoute,
    materializer: &Materializer<'_>,
    show_progress: bool,
) -> Result<MirrorStats, BuildError> {
    let tree = scan_tree(&route.source_root)?;
    debug!(
        "mirror";
        "{} and {} under {}",
        plural_count(tree.dirs.len(), "dir"),
        plural_count(tree.files.len(), "file"),
        route.source_root.display()
    );

    let fs = materializer.fs();
    let create = |target: std::path::PathBuf| {
        fs.create_dir_all(&target)
            .map_err(|e| BuildError::CreateDir(target, e))
    };

    // Directory barrier
    create(route.target_root.clone())?;
    tree.dirs
        .par_iter()
        .try_for_each(|dir| create(route.target_for(&dir.path)?))?;

    let transpile_total = tree
        .files
        .iter()
        .filter(|f| materializer.kind_of(&f.path) == SourceKind::Transpile)
        .count();
    let progress = show_progress.then(|| {
        ProgressLine::new("mirror", &[
            (SourceKind::Transpile.name(), transpile_total),
            (SourceKind::Copy.name(), tree.files.len() - transpile_total),
        ])
    });

    let counters = Counters::default();
    let result = tree.files.par_iter().try_for_each(|entry| {
        let target = route.target_for(&entry.path)?;
        let outcome = materializer.materialize(entry, &target)?;
        debug!("mirror"; "{} {}", outcome.label(), route.relative(&entry.path).display());
        counters.record(outcome);
        if let Some(progress) = &progress {
            progress.inc(outcome.kind().name());
        }
        Ok(())
    });

    // A failed pass drops the progress line instead, which clears it
    if let Some(progress) = progress
        && result.is_ok()
    {
        progress.finish();
    }
    result?;

    Ok(counters.into_stats(tree.dirs.len()))
}
