//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    catalog::CatalogCommands, completions::CompletionsArgs, config::ConfigCommands,
    configure::ConfigureArgs, init::InitArgs, options::OptionsArgs, submit::SubmitArgs,
};

#[derive(Parser)]
#[command(name = "pcfg")]
#[command(author, version, about = "Part Configurator")]
#[command(long_about = "Pick a manufacturing process, then a compatible material and finish from a static catalog, and submit the part's properties.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog file (default: configured catalog, then the built-in sample)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a configurator workspace
    Init(InitArgs),

    /// Browse and check the catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Show the option sets available for a partial selection
    Options(OptionsArgs),

    /// Configure a part interactively and submit it
    Configure(ConfigureArgs),

    /// Configure a part from flags and submit it
    Submit(SubmitArgs),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for lists, json for submissions)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}
