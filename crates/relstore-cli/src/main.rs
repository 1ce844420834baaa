//! Relstore Command-Line Client
//!
//! Plans schema migrations by diffing schema files, and applies them to a
//! versioned schema catalog.

mod config;
mod executor;
mod formatter;

use clap::Parser;
use config::{Args, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    let (config, command) = args.into_config();

    // Initialize tracing
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(format = %config.format, ?command, "running command");

    let formatter = formatter::create_formatter(config.format);
    match executor::execute(&config, &command, &*formatter) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
