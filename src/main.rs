//! buildrules CLI - declarative build-configuration resolver
//!
//! Entry point for the buildrules command-line application.

use anyhow::Result;
use clap::Parser;

use buildrules::cli::output::display_error;
use buildrules::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_config = cli.output_config();

    // RUST_LOG takes precedence over the flags
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(output_config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Run the command and handle errors
    match cli.run() {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
