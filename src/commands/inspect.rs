// src/commands/inspect.rs

//! Inspect command - recipe metadata and options

use anyhow::Result;
use pantry::find_recipe;

pub fn cmd_inspect(name: &str) -> Result<()> {
    let recipe = find_recipe(name)?;
    let info = recipe.info();

    println!("{} {}", info.name, info.version);
    println!("  {}", info.description);
    println!("  Homepage: {}", info.homepage);
    println!("  Recipe:   {}", info.url);
    println!("  License:  {}", info.license);

    println!("Options:");
    for decl in recipe.options() {
        println!("  {} (default: {})", decl.name, decl.default);
    }

    println!("Sources:");
    for source in recipe.sources() {
        println!("  {}", source.file_name());
    }

    Ok(())
}
