//! `[build]` section.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "app"          # tree to mirror
//! target = "lib"          # output tree
//! mode = "production"     # or "development" / "dev" / "prod"
//! jobs = 4                # worker threads (default: one per CPU)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::BuildMode;
use crate::utils::path::{is_within, normalize_path};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Source root, relative to the project root until normalized.
    pub source: PathBuf,
    /// Target root, relative to the project root until normalized.
    pub target: PathBuf,
    /// Selects the bundler profile.
    pub mode: BuildMode,
    /// Size of the dedicated worker pool; `None` uses the global pool.
    pub jobs: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "app".into(),
            target: "lib".into(),
            mode: BuildMode::default(),
            jobs: None,
        }
    }
}

pub struct BuildConfigFields {
    pub source: FieldPath,
    pub target: FieldPath,
    pub jobs: FieldPath,
}

impl BuildConfig {
    pub const FIELDS: BuildConfigFields = BuildConfigFields {
        source: FieldPath::new("build.source"),
        target: FieldPath::new("build.target"),
        jobs: FieldPath::new("build.jobs"),
    };

    /// Make both roots absolute against `root`.
    pub fn normalize(&mut self, root: &Path) {
        self.source = normalize_path(&root.join(&self.source));
        self.target = normalize_path(&root.join(&self.target));
    }

    /// Validate normalized paths and the worker count.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.source.exists() {
            diag.error(
                Self::FIELDS.source,
                format!("directory not found: {}", self.source.display()),
            );
        } else if !self.source.is_dir() {
            diag.error(
                Self::FIELDS.source,
                format!("not a directory: {}", self.source.display()),
            );
        }

        // Outputs written inside the source would be walked on the next build
        if is_within(&self.target, &self.source) {
            diag.error_with_hint(
                Self::FIELDS.target,
                format!(
                    "{} is inside {}: {}",
                    Self::FIELDS.target,
                    Self::FIELDS.source,
                    self.target.display()
                ),
                "pick a target directory next to the source tree",
            );
        }

        if self.jobs == Some(0) {
            diag.error(
                Self::FIELDS.jobs,
                format!("{} must be at least 1", Self::FIELDS.jobs),
            );
        }
    }
}
