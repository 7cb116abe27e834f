//! `[bundler]` section.
//!
//! # Example
//!
//! ```toml
//! [bundler]
//! enable = true
//! command = ["npx", "webpack"]
//! quiet = false                     # stream bundler output
//!
//! [bundler.development]
//! config = "build/webpack.config.dev.js"
//!
//! [bundler.production]
//! config = "build/webpack.config.prod.js"
//! args = ["--bail"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::BuildMode;
use crate::tools::BundleProfile;
use crate::utils::path::normalize_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Run the bundling pass at all.
    pub enable: bool,
    /// Bundler command; `--config <file>` is appended.
    pub command: Vec<String>,
    /// Suppress bundler output (default: true).
    pub quiet: bool,
    pub development: BundleProfileConfig,
    pub production: BundleProfileConfig,
}

/// One `[bundler.<mode>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BundleProfileConfig {
    /// Bundler config file, relative to the project root until normalized.
    pub config: PathBuf,
    /// Extra arguments for this mode.
    pub args: Vec<String>,
}

impl BundleProfileConfig {
    fn new(config: &str) -> Self {
        Self {
            config: config.into(),
            args: Vec::new(),
        }
    }
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            enable: true,
            command: vec!["npx".into(), "webpack".into()],
            quiet: true,
            development: BundleProfileConfig::new("build/webpack.config.dev.js"),
            production: BundleProfileConfig::new("build/webpack.config.prod.js"),
        }
    }
}

pub struct BundlerConfigFields {
    pub command: FieldPath,
    pub development_config: FieldPath,
    pub production_config: FieldPath,
}

impl BundlerConfig {
    pub const FIELDS: BundlerConfigFields = BundlerConfigFields {
        command: FieldPath::new("bundler.command"),
        development_config: FieldPath::new("bundler.development.config"),
        production_config: FieldPath::new("bundler.production.config"),
    };

    /// Profile used for `mode`.
    pub fn profile(&self, mode: BuildMode) -> BundleProfile {
        let section = match mode {
            BuildMode::Development => &self.development,
            BuildMode::Production => &self.production,
        };
        BundleProfile {
            mode,
            config: section.config.clone(),
            args: section.args.clone(),
        }
    }

    /// Make both profile config paths absolute against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for section in [&mut self.development, &mut self.production] {
            section.config = normalize_path(&root.join(&section.config));
        }
    }

    /// Validate the command and the config file of the profile `mode` uses.
    pub fn validate(&self, mode: BuildMode, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }

        super::validate_command(Self::FIELDS.command, &self.command, diag);

        let (field, config) = match mode {
            BuildMode::Development => (Self::FIELDS.development_config, &self.development.config),
            BuildMode::Production => (Self::FIELDS.production_config, &self.production.config),
        };
        if !config.is_file() {
            diag.error_with_hint(
                field,
                format!("bundler config not found: {}", config.display()),
                "set the path or disable bundling with `--no-bundle`",
            );
        }
    }
}
