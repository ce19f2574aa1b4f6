// src/commands/flags.rs

//! Flags command - show the lifecycle a cook would run

use super::{kitchen_config, load_profile};
use crate::cli::BuildArgs;
use anyhow::{Context, Result};
use pantry::{find_recipe, Kitchen};
use std::path::Path;

/// Print every step of a recipe's lifecycle without running anything
pub fn cmd_flags(config_path: Option<&Path>, args: &BuildArgs) -> Result<()> {
    let recipe = find_recipe(&args.recipe)?;
    let profile = load_profile(args)?;
    let kitchen = Kitchen::new(kitchen_config(config_path, args)?);

    let plan = kitchen
        .plan(recipe.as_ref(), &profile)
        .with_context(|| format!("Cannot plan {}", args.recipe))?;

    println!("Recipe: {} version {}", plan.name, plan.version);
    println!("Package id: {}", plan.package_id);
    println!("Options: {}", plan.context.options);
    if plan.raw_options != plan.context.options {
        println!("  (before resolution: {})", plan.raw_options);
    }
    println!("Sources:");
    for source in &plan.sources {
        match &source.subdir {
            Some(subdir) => println!("  {} -> {}", source.file_name(), subdir),
            None => println!("  {}", source.file_name()),
        }
    }

    println!("Steps:");
    for (index, step) in plan.steps.iter().enumerate() {
        println!("  {}. {} (in {})", index + 1, step.name, step.workdir.display());
        println!("     {}", step.command_line());
    }

    Ok(())
}
