//! Courier - file-persisted message bus for coordinating AI coding agents.

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod config;
mod directory;
mod error;
mod logging;
mod mailbox;
mod server;
mod tools;

use cli::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; the guard must outlive all logging so the
    // non-blocking file appender flushes on exit.
    let _guard = match logging::init() {
        Ok((guard, _log_dir)) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Parse command line arguments
    let args = Commands::parse();

    // Run the command
    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
