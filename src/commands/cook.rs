// src/commands/cook.rs

//! Cook command - build and install a recipe

use super::{kitchen_config, load_profile};
use crate::cli::BuildArgs;
use anyhow::{Context, Result};
use pantry::{find_recipe, Kitchen};
use std::path::Path;
use tracing::info;

/// Cook a recipe into its package folder
pub fn cmd_cook(config_path: Option<&Path>, args: &BuildArgs) -> Result<()> {
    let recipe = find_recipe(&args.recipe)?;
    let info = recipe.info();
    let profile = load_profile(args)?;
    let config = kitchen_config(config_path, args)?;

    println!("Recipe: {} version {}", info.name, info.version);
    for (key, value) in profile.settings.describe() {
        println!("  {} = {}", key, value);
    }
    println!("Cooking with {} parallel jobs...", config.jobs);

    let kitchen = Kitchen::new(config);
    let result = kitchen
        .cook(recipe.as_ref(), &profile)
        .with_context(|| format!("Failed to cook {}", info.name))?;

    println!("\n[COMPLETE] Cooked: {}/{}", info.name, info.version);
    println!("  Package id: {}", result.package_id);
    println!("  Package folder: {}", result.package_folder.display());
    println!("  Metadata: {}", result.metadata_path.display());

    info!(
        "Successfully cooked {} ({} steps)",
        info.name,
        result.steps_run.len()
    );

    Ok(())
}
