// src/commands/mod.rs
//! Command handlers for the pantry CLI

mod cook;
mod flags;
mod inspect;
mod list;

pub use cook::cmd_cook;
pub use flags::cmd_flags;
pub use inspect::cmd_inspect;
pub use list::cmd_list;

use crate::cli::BuildArgs;
use anyhow::{Context, Result};
use pantry::options::parse_override;
use pantry::{KitchenConfig, Profile};
use std::path::Path;
use tracing::debug;

/// Kitchen configuration from the config file, then the command line
///
/// An explicit `--config` must exist; the default location is optional.
pub(crate) fn kitchen_config(config_path: Option<&Path>, args: &BuildArgs) -> Result<KitchenConfig> {
    let mut config = match config_path {
        Some(path) => KitchenConfig::load(path)
            .with_context(|| format!("Failed to load kitchen config: {}", path.display()))?,
        None => match KitchenConfig::default_path().filter(|p| p.is_file()) {
            Some(path) => KitchenConfig::load(&path)
                .with_context(|| format!("Failed to load kitchen config: {}", path.display()))?,
            None => KitchenConfig::default(),
        },
    };

    if let Some(repo) = &args.source_repo {
        config.source_repo = Some(repo.clone());
    }
    if let Some(root) = &args.build_root {
        config.build_root = root.clone();
    }
    if let Some(root) = &args.package_root {
        config.package_root = root.clone();
    }
    if let Some(jobs) = args.jobs {
        anyhow::ensure!(jobs > 0, "--jobs must be at least 1");
        config.jobs = jobs;
    }
    if args.keep_builddir {
        config.keep_builddir = true;
    }

    debug!("Kitchen config: {:?}", config);
    Ok(config)
}

/// Profile from the profile file, then `-s` and `-o` overrides
pub(crate) fn load_profile(args: &BuildArgs) -> Result<Profile> {
    let mut profile = match &args.profile {
        Some(path) => Profile::load(path)
            .with_context(|| format!("Failed to load profile: {}", path.display()))?,
        None => Profile::default(),
    };

    for spec in &args.settings {
        profile
            .apply_setting_spec(spec)
            .with_context(|| format!("Invalid setting: {}", spec))?;
    }
    for spec in &args.options {
        let (name, value) =
            parse_override(spec).with_context(|| format!("Invalid option: {}", spec))?;
        profile.set_option(name, value);
    }

    Ok(profile)
}
