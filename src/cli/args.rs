//! Command-line interface definitions.

use crate::core::BuildMode;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Incremental app builder: bundles the UI and mirrors the source tree
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Bundle the UI and transpile/copy stale files into the target tree
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

/// Build arguments; each one overrides its `kiln.toml` value
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build mode selecting the bundler profile
    #[arg(short, long, value_enum)]
    pub mode: Option<BuildMode>,

    /// Source directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Target directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// Number of worker threads (default: one per CPU)
    #[arg(short, long, value_parser = clap::value_parser!(usize))]
    pub jobs: Option<usize>,

    /// Skip the bundling pass
    #[arg(long)]
    pub no_bundle: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
