mod api;
mod cli;
mod config;
mod models;
mod schedule;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    match cli.command {
        Some(Commands::Setup { reset }) => {
            handlers::handle_setup(&mut config, reset)?;
        }

        // Preference edits work without a finished setup
        Some(Commands::Location {
            label,
            latitude,
            longitude,
            country,
        }) => {
            handlers::handle_location(&mut config, &label, latitude, longitude, country.as_deref())?;
        }
        Some(Commands::Method { method, school }) => {
            handlers::handle_method(&mut config, method, school)?;
        }
        Some(Commands::Format { format }) => {
            handlers::handle_format(&mut config, &format)?;
        }

        Some(Commands::Times { city, country }) => {
            ensure_setup(&mut config)?;
            handlers::handle_times(&mut config, city.as_deref(), country.as_deref())?;
        }
        Some(Commands::Week) => {
            ensure_setup(&mut config)?;
            handlers::handle_week(&config)?;
        }

        // No subcommand → launch TUI
        None => {
            ensure_setup(&mut config)?;
            tui::app::run(config)?;
        }
    }

    Ok(())
}

/// Run the wizard automatically the first time, before anything needs a location.
fn ensure_setup(config: &mut AppConfig) -> Result<()> {
    if !AppConfig::exists() {
        eprintln!("No configuration found. Running setup...");
        eprintln!();
        handlers::handle_setup(config, false)?;
    }
    Ok(())
}
