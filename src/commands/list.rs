// src/commands/list.rs

//! List command - known recipes

use anyhow::Result;
use pantry::all_recipes;

pub fn cmd_list() -> Result<()> {
    for recipe in all_recipes() {
        let info = recipe.info();
        println!("{:<8} {:<8} {}", info.name, info.version, info.description);
    }
    Ok(())
}
