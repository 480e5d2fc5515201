//! ## callsim-cli
//! **Command line entry point for the call-center workload generator**
//!
//! ### Commands:
//! - `run`: generate traffic for the configured duration, then drain
//! - `check-config`: load and validate configuration without running

use callsim_telemetry::logging::EventLogger;
use clap::Parser;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    EventLogger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(run_args) => commands::run(run_args).await,
        Commands::CheckConfig(check_args) => commands::check_config(check_args),
    }
}
