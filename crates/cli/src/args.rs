//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// pagewatch: monitor web pages and summarize what changed
#[derive(Parser, Debug)]
#[command(name = "pagewatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check all registered pages and report what changed
    Update(UpdateArgs),

    /// Refetch all pages and rebaseline the cache without reporting
    Recheck,

    /// List registered pages and their check status
    List(ListArgs),

    /// Print the last change summaries
    Print(PrintArgs),

    /// Register a page
    Add(AddArgs),

    /// Deregister a page and drop its cached snapshot
    Delete(DeleteArgs),

    /// Rename a page (its URL and cache stay the same)
    Rename(RenameArgs),

    /// Import registry entries from a JSON file, replacing the registry
    Import(ImportArgs),

    /// Export registry entries to a JSON file
    Export(ExportArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Check and report without mutating the cache
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PrintArgs {
    /// Print only this page's summary
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Page URL
    #[arg(long)]
    pub url: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Display name of the page to remove
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Current display name
    #[arg(long)]
    pub from: String,

    /// New display name
    #[arg(long)]
    pub to: String,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file with [{"name": ..., "url": ...}] entries
    #[arg(long)]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination JSON file
    #[arg(long)]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
