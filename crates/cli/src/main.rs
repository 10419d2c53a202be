//! pagewatch CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    init_logging(log_level)?;

    // Execute command
    match cli.command {
        Commands::Update(args) => commands::update::execute(args, cli.config).await,
        Commands::Recheck => commands::update::recheck(cli.config).await,
        Commands::List(args) => commands::registry::list(args, cli.config).await,
        Commands::Print(args) => commands::registry::print(args, cli.config).await,
        Commands::Add(args) => commands::registry::add(args, cli.config).await,
        Commands::Delete(args) => commands::registry::delete(args, cli.config).await,
        Commands::Rename(args) => commands::registry::rename(args, cli.config).await,
        Commands::Import(args) => commands::registry::import(args, cli.config).await,
        Commands::Export(args) => commands::registry::export(args, cli.config).await,
        Commands::Config(args) => commands::config::execute(args).await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
