//! Kiln - incremental app builder.
//!
//! Bundles the UI and mirrors the source tree into the target tree,
//! transpiling scripts and copying everything else, skipping files whose
//! target is already newer than the source.

mod cli;
mod config;
mod core;
mod freshness;
mod logger;
mod mirror;
mod tools;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_project};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    apply_color(cli.color);

    let config = ProjectConfig::load(&cli)?;
    match &cli.command {
        Commands::Build { .. } => {
            build_project(&config)?;
        }
    }
    Ok(())
}

/// `auto` leaves terminal detection to owo-colors.
fn apply_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
}
