//! Per-file script transpilation.

use crate::config::ProjectConfig;
use crate::core::BuildMode;
use crate::logger::is_verbose;
use crate::utils::exec::{Cmd, Echo};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::vars::{build_kiln_vars, resolve_args};

/// Rewrites one script source file.
///
/// The transform options are fixed for the whole build; callers only pass the
/// file. Called concurrently from the mirror workers.
pub trait Transpiler: Send + Sync {
    /// Transform `source` and return the output code.
    fn transpile(&self, source: &Path) -> Result<String>;
}

/// Transpiler backed by an external command.
///
/// Runs `command args... <source>` in the project root and takes stdout as the
/// transformed code.
#[derive(Debug, Clone)]
pub struct CommandTranspiler {
    argv: Vec<String>,
    root: PathBuf,
    envs: Vec<(String, String)>,
}

impl CommandTranspiler {
    pub fn new(argv: Vec<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            root: root.into(),
            envs: Vec::new(),
        }
    }

    /// Build from the `[transpiler]` section, with `$KILN_*` resolved.
    pub fn from_config(config: &ProjectConfig, mode: BuildMode) -> Self {
        let vars = build_kiln_vars(config, mode);
        let section = &config.transpiler;

        let mut argv = resolve_args(&section.command, &vars);
        argv.extend(resolve_args(&section.args, &vars));

        Self {
            argv,
            root: config.get_root().to_path_buf(),
            envs: vars.into_iter().collect(),
        }
    }
}

impl Transpiler for CommandTranspiler {
    fn transpile(&self, source: &Path) -> Result<String> {
        // Warnings on stderr are only shown with --verbose
        let echo = if is_verbose() { Echo::All } else { Echo::Off };

        let output = Cmd::from_slice(&self.argv)
            .arg(source)
            .cwd(&self.root)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .echo(echo)
            .run()?;

        String::from_utf8(output.stdout)
            .with_context(|| format!("transpiler output for `{}` is not UTF-8", source.display()))
    }
}
