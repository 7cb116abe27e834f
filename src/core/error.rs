//! Build error taxonomy.
//!
//! Target-stat failures during the freshness check never become errors; they
//! force a rebuild instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error from an external tool (transpiler, bundler).
pub type ToolError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that fail a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Source tree (or an entry in it) could not be enumerated.
    #[error("cannot read source tree at `{}`", .0.display())]
    Walk(PathBuf, #[source] io::Error),

    /// A walked path did not live under the source root.
    #[error("`{}` is outside source root `{}`", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Target directory could not be created.
    #[error("failed to create directory `{}`", .0.display())]
    CreateDir(PathBuf, #[source] io::Error),

    /// Transpiler rejected a source file.
    #[error("failed to transpile `{}`", .0.display())]
    Transpile(PathBuf, #[source] ToolError),

    /// Writing or copying a target file failed.
    #[error("failed to write `{}`", .0.display())]
    Write(PathBuf, #[source] io::Error),

    /// Bundler run failed.
    #[error("bundler failed ({profile} profile)")]
    Bundle {
        profile: &'static str,
        #[source]
        source: ToolError,
    },
}
