//! Source file kind: determines how a file is materialized.

use std::path::Path;

/// How a source file becomes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Script source, run through the transpiler.
    Transpile,
    /// Anything else, copied verbatim.
    Copy,
}

impl SourceKind {
    /// Detect kind from the final extension of `path`.
    ///
    /// Comparison is exact (case-sensitive, no leading dot) against
    /// `transformable`. A path without an extension is always `Copy`.
    pub fn from_path<S: AsRef<str>>(path: &Path, transformable: &[S]) -> Self {
        let ext = path.extension().and_then(|e| e.to_str());
        match ext {
            Some(ext) if transformable.iter().any(|t| t.as_ref() == ext) => Self::Transpile,
            _ => Self::Copy,
        }
    }

    /// Display name, also used as progress counter name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Transpile => "transpile",
            Self::Copy => "copy",
        }
    }
}
