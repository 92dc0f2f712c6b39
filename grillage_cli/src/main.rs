//! # Grillage CLI
//!
//! Command line front end for the twin-structure girder spacing calculator.
//!
//! ```text
//! grillage calc                          # shared-path spacing with defaults
//! grillage calc --girders-path 3 -f table
//! grillage new deck.gsp --job 26-001
//! grillage add deck.gsp -l "Option B" --girder-gap 40
//! grillage run deck.gsp -f json
//! ```

mod commands;
mod output;

use clap::{Parser, Subcommand};
use grillage_core::CalcError;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Girder spacing for twin road / shared path bridge decks
#[derive(Parser)]
#[command(name = "grillage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bridge deck girder spacing calculator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate one deck layout
    Calc(commands::calc::CalcArgs),
    /// Create a project file
    New(commands::project::NewArgs),
    /// Add a layout to a project file
    Add(commands::project::AddArgs),
    /// Calculate every layout in a project file
    Run(commands::project::RunArgs),
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Calc(args) => commands::calc::execute(args),
        Commands::New(args) => commands::project::execute_new(args),
        Commands::Add(args) => commands::project::execute_add(args),
        Commands::Run(args) => commands::project::execute_run(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(calc_error) = e.chain().find_map(|cause| cause.downcast_ref::<CalcError>()) {
                if let Ok(json) = serde_json::to_string_pretty(calc_error) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}
