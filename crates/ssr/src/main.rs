//! SSR CLI - server-side rendering server.
//!
//! Provides commands for:
//! - `serve`: Start the rendering server
//! - `render`: Render a single URL to stdout
//! - `ngh parse` / `ngh stringify`: Inspect compact hydration state

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NghCommand, RenderArgs, ServeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SSR - server-side rendering server.
#[derive(Parser)]
#[command(name = "ssr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the rendering server.
    Serve(ServeArgs),
    /// Render one URL and print the HTML.
    Render(RenderArgs),
    /// Hydration state encoding commands.
    #[command(subcommand)]
    Ngh(NghCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Serve(args) => args.verbose,
        Commands::Render(args) => args.verbose,
        Commands::Ngh(_) => false,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => run_async(args.execute(VERSION)),
        Commands::Render(args) => run_async(args.execute()),
        Commands::Ngh(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run_async(
    future: impl std::future::Future<Output = Result<(), error::CliError>>,
) -> Result<(), error::CliError> {
    tokio::runtime::Runtime::new()?.block_on(future)
}
