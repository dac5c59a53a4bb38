//! srcgen CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod glob_expand;

#[derive(Parser)]
#[command(name = "srcgen")]
#[command(version)]
#[command(about = "Build-time source patching and code generation tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite attribute call sites in source files
    Patch(commands::patch::PatchArgs),

    /// Run the configured generators for input files
    Generate(commands::generate::GenerateArgs),

    /// Show the generators resolved for one input file
    ListGenerators(commands::list::ListArgs),

    /// Update copyright years and version numbers
    Stamp(commands::stamp::StampArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srcgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Patch(args) => commands::patch::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::ListGenerators(args) => commands::list::execute(args),
        Commands::Stamp(args) => commands::stamp::execute(args),
    }
}
