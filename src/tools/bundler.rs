//! UI bundling pass.

use crate::config::ProjectConfig;
use crate::core::BuildMode;
use crate::utils::exec::{Cmd, Echo};
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::io::IsTerminal;
use std::path::PathBuf;

use super::vars::{build_kiln_vars, resolve_args};

/// Bundler settings for one build mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleProfile {
    pub mode: BuildMode,
    /// Bundler config file, absolute
    pub config: PathBuf,
    /// Extra arguments for this profile
    pub args: Vec<String>,
}

impl BundleProfile {
    /// Profile name for logging and errors.
    pub fn name(&self) -> &'static str {
        self.mode.name()
    }
}

/// Packages the UI in a single run.
pub trait Bundler: Send + Sync {
    /// Run the bundler once with `profile` and wait for it to finish.
    fn run(&self, profile: &BundleProfile) -> Result<()>;
}

/// Bundler backed by an external command.
///
/// Runs `command --config <profile.config> profile.args...` in the project
/// root. Only the exit status is looked at.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    command: Vec<String>,
    root: PathBuf,
    envs: Vec<(String, String)>,
    quiet: bool,
}

impl CommandBundler {
    pub fn new(command: Vec<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
            envs: Vec::new(),
            quiet: true,
        }
    }

    /// Build from the `[bundler]` section, with `$KILN_*` resolved.
    pub fn from_config(config: &ProjectConfig, mode: BuildMode) -> Self {
        let vars = build_kiln_vars(config, mode);
        Self {
            command: resolve_args(&config.bundler.command, &vars),
            root: config.get_root().to_path_buf(),
            envs: vars.into_iter().collect(),
            quiet: config.bundler.quiet,
        }
    }

    fn argv(&self, profile: &BundleProfile) -> Vec<String> {
        let vars: FxHashMap<String, String> = self.envs.iter().cloned().collect();
        let mut argv = self.command.clone();
        argv.push("--config".into());
        argv.push(profile.config.display().to_string());
        argv.extend(resolve_args(&profile.args, &vars));
        argv
    }
}

impl Bundler for CommandBundler {
    fn run(&self, profile: &BundleProfile) -> Result<()> {
        // Stream through a PTY only when someone is watching
        let pty = !self.quiet && std::io::stdout().is_terminal();
        let echo = if self.quiet { Echo::Off } else { Echo::All };

        Cmd::from_slice(&self.argv(profile))
            .cwd(&self.root)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .pty(pty)
            .echo(echo)
            .run()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn profile(args: &[&str]) -> BundleProfile {
        BundleProfile {
            mode: BuildMode::Production,
            config: PathBuf::from("/proj/build/webpack.config.prod.js"),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_argv_appends_profile_config() {
        let bundler = CommandBundler::new(vec!["npx".into(), "webpack".into()], "/proj");
        assert_eq!(
            bundler.argv(&profile(&["--bail"])),
            vec![
                "npx",
                "webpack",
                "--config",
                "/proj/build/webpack.config.prod.js",
                "--bail"
            ]
        );
    }

    #[test]
    fn test_from_config_selects_command_and_env() {
        let config = crate::config::test_config(
            Path::new("/proj"),
            "[bundler]\ncommand = [\"webpack-cli\"]\nquiet = false\n",
        );
        let bundler = CommandBundler::from_config(&config, BuildMode::Development);

        assert_eq!(bundler.command, vec!["webpack-cli"]);
        assert!(!bundler.quiet);
        assert!(
            bundler
                .envs
                .iter()
                .any(|(k, v)| k == "KILN_MODE" && v == "development")
        );
    }

    #[test]
    fn test_profile_args_resolve_vars() {
        let config = crate::config::test_config(Path::new("/proj"), "");
        let bundler = CommandBundler::from_config(&config, BuildMode::Production);
        let argv = bundler.argv(&profile(&["--output-path=$KILN_TARGET_DIR"]));
        assert_eq!(argv.last().unwrap(), "--output-path=/proj/lib");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let bundler = CommandBundler::new(
            vec!["sh".into(), "-c".into(), "echo 'Module not found' >&2; exit 2".into()],
            dir.path(),
        );
        let err = bundler.run(&profile(&[])).unwrap_err();
        assert!(err.to_string().contains("Module not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_in_project_root() {
        let dir = tempfile::TempDir::new().unwrap();
        // `sh -c SCRIPT --config FILE` binds $0=--config $1=FILE
        let script = "touch \"$KILN_MODE.done\"; test \"$0\" = --config";
        let mut bundler = CommandBundler::new(
            vec!["sh".into(), "-c".into(), script.into()],
            dir.path(),
        );
        bundler.envs.push(("KILN_MODE".into(), "production".into()));

        bundler.run(&profile(&[])).unwrap();

        assert!(dir.path().join("production.done").exists());
    }
}
