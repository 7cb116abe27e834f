//! Source → target path mapping.

use std::path::{Path, PathBuf};

use crate::core::BuildError;

/// Rebases paths from the source root onto the target root.
///
/// The relative path under the target root always equals the relative path
/// under the source root.
#[derive(Debug, Clone)]
pub struct TreeRoute {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
}

impl TreeRoute {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    /// Target path for a path under the source root.
    pub fn target_for(&self, source: &Path) -> Result<PathBuf, BuildError> {
        let rel = source
            .strip_prefix(&self.source_root)
            .map_err(|_| BuildError::OutsideRoot {
                path: source.to_path_buf(),
                root: self.source_root.clone(),
            })?;
        Ok(self.target_root.join(rel))
    }

    /// Path relative to the source root, for display.
    pub fn relative<'a>(&self, source: &'a Path) -> &'a Path {
        source.strip_prefix(&self.source_root).unwrap_or(source)
    }
}
