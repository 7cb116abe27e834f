//! Project configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [build], [transpiler], [bundler]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util           # config file discovery
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! Every path in the file is relative to the directory holding `kiln.toml`
//! (the project root). Without a config file the defaults apply and the
//! current directory is the root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

use section::{BuildConfig, BundlerConfig, TranspilerConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    core::BuildMode,
    debug, log,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "kiln.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file; `None` when running on defaults
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source/target roots, mode and worker count
    #[serde(default)]
    pub build: BuildConfig,

    /// Per-file transform tool
    #[serde(default)]
    pub transpiler: TranspilerConfig,

    /// Bundler tool and profiles
    #[serde(default)]
    pub bundler: BundlerConfig,
}

impl ProjectConfig {
    /// Load configuration for the given command line.
    ///
    /// An explicit `--config` must exist. Otherwise `kiln.toml` is searched
    /// upward from cwd and the defaults are used when none is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(&cwd, Path::new(CONFIG_FILE)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)
                .with_context(|| format!("Failed to load `{}`", path.display()))?,
            None => {
                debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.config_path = config_path;

        let Commands::Build { build_args } = &cli.command;
        config.apply_build_args(build_args);
        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Build mode after CLI overrides.
    pub fn mode(&self) -> BuildMode {
        self.build.mode
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply build arguments from CLI (before path normalization).
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.mode, args.mode.as_ref());
        Self::update_option(&mut self.build.source, args.source.as_ref());
        Self::update_option(&mut self.build.target, args.target.as_ref());
        if args.jobs.is_some() {
            self.build.jobs = args.jobs;
        }
        if args.no_bundle {
            self.bundler.enable = false;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve the root and make every configured path absolute.
    fn finalize(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.build.normalize(&root);
        self.bundler.normalize(&root);
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the finalized configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.transpiler.validate(&mut diag);
        self.bundler.validate(self.build.mode, &mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse `content` and finalize it against `root`.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_config(root: &Path, content: &str) -> ProjectConfig {
    let (mut parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed.finalize(root);
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_toml() {
        let result = ProjectConfig::parse_with_ignored("[build\nsource = \"app\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_invalid_mode() {
        let result = ProjectConfig::parse_with_ignored("[build]\nmode = \"staging\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\nsource = \"src\"\nminify = true\n[unknown_section]\nfield = 1";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.source, PathBuf::from("src"));
        assert!(ignored.iter().any(|f| f == "build.minify"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[build]\nmode = \"dev\"\n[transpiler]\nextensions = [\"js\"]\n[bundler.production]\nargs = []";
        let (_, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_cli_overrides_file() {
        let (mut config, _) = ProjectConfig::parse_with_ignored(
            "[build]\nsource = \"app\"\nmode = \"development\"\njobs = 8",
        )
        .unwrap();

        config.apply_build_args(&BuildArgs {
            mode: Some(BuildMode::Production),
            source: Some(PathBuf::from("src")),
            jobs: Some(2),
            no_bundle: true,
            ..Default::default()
        });
        config.finalize(Path::new("/proj"));

        assert_eq!(config.mode(), BuildMode::Production);
        assert_eq!(config.build.source, PathBuf::from("/proj/src"));
        assert_eq!(config.build.target, PathBuf::from("/proj/lib"));
        assert_eq!(config.build.jobs, Some(2));
        assert!(!config.bundler.enable);
    }

    #[test]
    fn test_absent_cli_flags_keep_file_values() {
        let (mut config, _) =
            ProjectConfig::parse_with_ignored("[build]\nmode = \"prod\"\njobs = 8").unwrap();
        config.apply_build_args(&BuildArgs::default());
        assert_eq!(config.mode(), BuildMode::Production);
        assert_eq!(config.build.jobs, Some(8));
        assert!(config.bundler.enable);
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[build]\ntarget = \"out\"\n").unwrap();

        let config = ProjectConfig::from_path(&path).unwrap();
        assert_eq!(config.build.target, PathBuf::from("out"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ProjectConfig::from_path(Path::new("/nonexistent/kiln.toml"));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_validate_reports_all_sections() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config(
            dir.path(),
            "[transpiler]\ncommand = []\nextensions = []\n[bundler]\ncommand = []\n",
        );

        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"build.source"));
        assert!(fields.contains(&"transpiler.command"));
        assert!(fields.contains(&"transpiler.extensions"));
        assert!(fields.contains(&"bundler.command"));
        assert!(fields.contains(&"bundler.development.config"));
    }
}
