//! # runprep Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the runprep CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! runprep --help
//!
//! # Prepare a run with increased verbosity
//! runprep -vv prepare runs/ocean/manifest.toml
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to appropriate command handler
//! 4. Format and display any errors that occur
//!
use clap::{Parser, Subcommand};
use runprep::commands;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "runprep",
    about = "Idempotent run-directory preparation: directories, symlinks, namelist patches",
    long_about = "Prepare job run directories safely and repeatably.\n\
                  Every command can be rerun: existing directories and correct links are left alone.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    Mkdir(commands::mkdir::MkdirArgs),
    #[command(alias = "ln")]
    Link(commands::link::LinkArgs),
    Patch(commands::patch::PatchArgs),
    Prepare(commands::prepare::PrepareArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Mkdir(args) => commands::mkdir::handle_mkdir(args),
        Commands::Link(args) => commands::link::handle_link(args),
        Commands::Patch(args) => commands::patch::handle_patch(args),
        Commands::Prepare(args) => commands::prepare::handle_prepare(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
