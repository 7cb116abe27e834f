//! Single-file materialization.

use std::path::Path;

use super::entry::SourceEntry;
use super::fs::TargetFs;
use super::kind::SourceKind;
use crate::core::BuildError;
use crate::freshness::should_skip;
use crate::tools::Transpiler;

/// What happened to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Target was newer than the source; nothing written.
    Skipped(SourceKind),
    Transpiled,
    Copied,
}

impl Outcome {
    /// Past-tense label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skipped(_) => "fresh",
            Self::Transpiled => "transpiled",
            Self::Copied => "copied",
        }
    }

    pub const fn kind(self) -> SourceKind {
        match self {
            Self::Skipped(kind) => kind,
            Self::Transpiled => SourceKind::Transpile,
            Self::Copied => SourceKind::Copy,
        }
    }
}

/// Produces target files from source entries.
///
/// Shared by all workers of a build; holds no per-file state.
pub struct Materializer<'a> {
    fs: &'a dyn TargetFs,
    transpiler: &'a dyn Transpiler,
    extensions: &'a [String],
}

impl<'a> Materializer<'a> {
    pub fn new(
        fs: &'a dyn TargetFs,
        transpiler: &'a dyn Transpiler,
        extensions: &'a [String],
    ) -> Self {
        Self {
            fs,
            transpiler,
            extensions,
        }
    }

    pub fn fs(&self) -> &'a dyn TargetFs {
        self.fs
    }

    pub fn kind_of(&self, path: &Path) -> SourceKind {
        SourceKind::from_path(path, self.extensions)
    }

    /// Bring `target` up to date with `entry`.
    ///
    /// A fresh target is left alone without any write. Otherwise the target
    /// is replaced with transpiled code or a byte copy.
    pub fn materialize(&self, entry: &SourceEntry, target: &Path) -> Result<Outcome, BuildError> {
        let kind = self.kind_of(&entry.path);

        if should_skip(entry.modified, target) {
            return Ok(Outcome::Skipped(kind));
        }

        let write_err = |e| BuildError::Write(target.to_path_buf(), e);
        match kind {
            SourceKind::Transpile => {
                let code = self
                    .transpiler
                    .transpile(&entry.path)
                    .map_err(|e| BuildError::Transpile(entry.path.clone(), e.into()))?;
                self.fs
                    .write(target, code.as_bytes(), &entry.path)
                    .map_err(write_err)?;
                Ok(Outcome::Transpiled)
            }
            SourceKind::Copy => {
                self.fs.copy(&entry.path, target).map_err(write_err)?;
                Ok(Outcome::Copied)
            }
        }
    }
}
