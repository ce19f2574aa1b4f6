// src/cli/mod.rs
//! CLI definitions for pantry
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `cook` - Build and install a recipe
//! - `flags` - Show every step a cook would run, without running it
//! - `inspect` - Show a recipe's metadata and options
//! - `list` - List known recipes

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(version)]
#[command(about = "Cook vendored C++ libraries from local source archives", long_about = None)]
pub struct Cli {
    /// Kitchen config file (default: <config dir>/pantry/kitchen.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a recipe and install it into its package folder
    Cook(BuildArgs),

    /// Print the command line of every lifecycle step (dry run)
    Flags(BuildArgs),

    /// Show a recipe's metadata and declared options
    Inspect {
        /// Recipe name
        recipe: String,
    },

    /// List known recipes
    List,
}

/// Recipe, profile and kitchen arguments shared by `cook` and `flags`
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Recipe name (boost, fmt, qt)
    pub recipe: String,

    /// Profile file with settings and option overrides
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Setting override, applied after the profile (e.g. compiler.runtime=MT)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Option override, applied after the profile (e.g. shared=true)
    #[arg(short = 'o', long = "option", value_name = "NAME=BOOL")]
    pub options: Vec<String>,

    /// Directory holding the source archives
    #[arg(long, env = "PANTRY_SOURCE_REPO")]
    pub source_repo: Option<PathBuf>,

    /// Parent directory of working directories
    #[arg(long)]
    pub build_root: Option<PathBuf>,

    /// Parent directory of package folders
    #[arg(long)]
    pub package_root: Option<PathBuf>,

    /// Number of parallel build jobs (default: CPU count)
    #[arg(short, long)]
    pub jobs: Option<u32>,

    /// Keep the working directory after a successful cook
    #[arg(long)]
    pub keep_builddir: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cook() {
        let cli = Cli::try_parse_from([
            "pantry",
            "cook",
            "boost",
            "-s",
            "os=Windows",
            "-s",
            "compiler=msvc",
            "-o",
            "shared=false",
            "--source-repo",
            "/srv/sources",
            "-j",
            "2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Cook(args)) => {
                assert_eq!(args.recipe, "boost");
                assert_eq!(args.settings, ["os=Windows", "compiler=msvc"]);
                assert_eq!(args.options, ["shared=false"]);
                assert_eq!(args.source_repo, Some(PathBuf::from("/srv/sources")));
                assert_eq!(args.jobs, Some(2));
                assert!(!args.keep_builddir);
            }
            _ => panic!("expected cook"),
        }
    }
}
