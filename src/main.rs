// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Cook(args)) => commands::cmd_cook(config, &args),
        Some(Commands::Flags(args)) => commands::cmd_flags(config, &args),
        Some(Commands::Inspect { recipe }) => commands::cmd_inspect(&recipe),
        Some(Commands::List) => commands::cmd_list(),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
