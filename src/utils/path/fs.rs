//! Absolute, comparable paths.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute so configured roots can be compared.
///
/// Existing paths are canonicalized. A path that does not exist yet (a
/// fresh target root) is made absolute against the current directory and
/// its `.`/`..` components are folded lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Whether `path` is `base` or lies below it, compared component-wise.
///
/// Both paths are expected to be normalized.
pub fn is_within(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}
