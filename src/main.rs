// src/main.rs
mod browse;
mod cli;
mod config;
mod console;
mod editor;
mod error;
mod input;
mod menu;
mod models;
mod search;
mod store;

use clap::Parser;

fn main() -> Result<(), error::AppError> {
    env_logger::init();
    log::info!("Starting worklog");

    let cli_args = cli::Cli::parse();

    if let Err(e) = cli::handle_cli_command(cli_args) {
        log::error!("Application failed: {:#?}", e);
        eprintln!("Error: {}", e);
        return Err(e);
    }

    log::info!("worklog finished successfully.");
    Ok(())
}
