//! Test doubles for the mirror pipeline.

use super::fs::{StdFs, TargetFs};
use crate::tools::Transpiler;
use anyhow::{Result, bail};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Prefixes the source text with `// transpiled\n`.
///
/// Files whose name is in `reject` fail like a syntax error would.
#[derive(Default)]
pub struct FakeTranspiler {
    pub reject: Vec<&'static str>,
    calls: AtomicUsize,
}

pub const TRANSPILED_HEADER: &str = "// transpiled\n";

impl FakeTranspiler {
    pub fn rejecting(names: &[&'static str]) -> Self {
        Self {
            reject: names.to_vec(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transpiler for FakeTranspiler {
    fn transpile(&self, source: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = source.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if self.reject.iter().any(|r| *r == name) {
            bail!("SyntaxError: {name}: Unexpected token (1:1)");
        }
        let text = fs::read_to_string(source)?;
        Ok(format!("{TRANSPILED_HEADER}{text}"))
    }
}

/// One call into [`RecordingFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    CreateDir(PathBuf),
    Write(PathBuf),
    Copy(PathBuf),
}

impl FsEvent {
    pub fn is_file_write(&self) -> bool {
        !matches!(self, Self::CreateDir(_))
    }
}

/// Real filesystem that logs every call in order.
#[derive(Default)]
pub struct RecordingFs {
    inner: StdFs,
    events: Mutex<Vec<FsEvent>>,
}

impl RecordingFs {
    pub fn events(&self) -> Vec<FsEvent> {
        self.events.lock().clone()
    }

    /// Number of file writes and copies.
    pub fn file_writes(&self) -> usize {
        self.events.lock().iter().filter(|e| e.is_file_write()).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl TargetFs for RecordingFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path)?;
        self.events.lock().push(FsEvent::CreateDir(path.to_path_buf()));
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8], like: &Path) -> io::Result<()> {
        self.events.lock().push(FsEvent::Write(path.to_path_buf()));
        self.inner.write(path, contents, like)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.events.lock().push(FsEvent::Copy(to.to_path_buf()));
        self.inner.copy(from, to)
    }
}

/// Set the mtime of `path` to `secs` after the epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let time = std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs);
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}
