//! tacos - token and cost estimates for a directory tree
//!
//! tacos provides:
//! - Flat, expanded and collapsed directory listings
//! - Token counts via tiktoken encodings
//! - Input and output cost estimates from a built-in pricing table
//! - .gitignore / .tacosignore aware exclusion
//! - Table, JSON and JSON Lines output

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;

fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}
