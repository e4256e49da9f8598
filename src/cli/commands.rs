//! Command implementations for the TOA5 CLI
//!
//! This module dispatches subcommands and sets up logging. The individual
//! commands live in the submodules.

pub mod header;
pub mod records;
pub mod shared;
pub mod validate;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use tracing::debug;

/// Main command runner for the TOA5 tool
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    match args.command {
        Some(Commands::Header(header_args)) => header::run_header(header_args),
        Some(Commands::Records(records_args)) => records::run_records(records_args, args.quiet),
        Some(Commands::Validate(validate_args)) => validate::run_validate(validate_args),
        None => Ok(()),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("toa5={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}
