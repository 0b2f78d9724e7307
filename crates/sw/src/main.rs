//! sw CLI - StackWatch portal and documentation viewer.
//!
//! Provides commands for:
//! - `serve`: Start the portal and help viewer server
//! - `check`: Validate the documentation manifest and its documents
//! - `render`: Render one document to HTML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs, ServeArgs};
use error::CliError;
use output::{Output, Tone};

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// sw - StackWatch portal and documentation viewer.
#[derive(Parser)]
#[command(name = "sw", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the portal server.
    Serve(ServeArgs),
    /// Check the documentation manifest and every document it lists.
    Check(CheckArgs),
    /// Render one document to HTML on stdout.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Serve(args) => args.verbose,
        Commands::Check(args) => args.verbose,
        Commands::Render(_) => false,
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

    if let Err(err) = run(cli.command) {
        output.line(Tone::Bad, &format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(args.execute(VERSION))
        }
        Commands::Check(args) => args.execute(VERSION),
        Commands::Render(args) => args.execute(VERSION),
    }
}
