//! Target filesystem port.
//!
//! Every write into the target tree goes through [`TargetFs`]. Reads of the
//! source tree and target stats do not.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write operations on the target tree.
///
/// Implementations must be safe to call from many worker threads at once.
pub trait TargetFs: Send + Sync {
    /// Create a directory and all missing parents. Existing directories are not an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replace `path` with `contents`, giving it the permissions of `like`.
    fn write(&self, path: &Path, contents: &[u8], like: &Path) -> io::Result<()>;

    /// Replace `to` with the bytes and permissions of `from`.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Local filesystem.
///
/// Files are written to a temporary sibling and renamed into place, so a
/// target is either the old file or the complete new one.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl StdFs {
    fn temp_sibling(path: &Path) -> io::Result<NamedTempFile> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        NamedTempFile::new_in(dir)
    }
}

impl TargetFs for StdFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8], like: &Path) -> io::Result<()> {
        let permissions = fs::metadata(like)?.permissions();
        let mut tmp = Self::temp_sibling(path)?;
        tmp.write_all(contents)?;
        tmp.flush()?;
        // Temp files are created owner-only
        tmp.as_file().set_permissions(permissions)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let tmp = Self::temp_sibling(to)?;
        fs::copy(from, tmp.path())?;
        tmp.persist(to).map_err(|e| e.error)?;
        Ok(())
    }
}
