//! Lumen CLI - run image filter pipelines from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Lumen image filter graph CLI", long_about = None)]
struct Cli {
    /// Log graph construction and per-frame activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run images through a pipeline or a single filter
    Process(commands::process::ProcessArgs),

    /// List available filters and their parameters
    Filters(commands::filters::FiltersArgs),

    /// List factory and user pipelines
    Pipelines(commands::pipelines::PipelinesArgs),

    /// Check a pipeline file without running it
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Filters(args) => commands::filters::run(args),
        Commands::Pipelines(args) => commands::pipelines::run(args),
        Commands::Validate(args) => commands::validate::run(args),
    }
}
