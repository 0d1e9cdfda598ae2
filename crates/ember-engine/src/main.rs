//! # Ember Engine
//!
//! Headless driver for the combat popup pipeline.
//!
//! This crate ties together:
//! - Kernel: popup scheduling, anchoring and label animation
//! - Gameplay: combatants, combat events and the game-state owner
//!
//! Usage:
//! - `ember [CONFIG]` runs the skirmish (config defaults to `ember.toml`)
//! - `ember --write-config [PATH]` writes the default configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

#[cfg(test)]
mod e2e_tests;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// What the binary was asked to do.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Run the skirmish with the config at this path
    Run(PathBuf),
    /// Write the default config to this path
    WriteConfig(PathBuf),
}

impl Command {
    /// Parses the arguments that follow the program name.
    fn parse(mut args: impl Iterator<Item = OsString>) -> Self {
        let default_path = || PathBuf::from(CONFIG_FILE);
        match args.next() {
            Some(arg) if arg == "--write-config" => {
                Self::WriteConfig(args.next().map_or_else(default_path, PathBuf::from))
            },
            Some(arg) => Self::Run(PathBuf::from(arg)),
            None => Self::Run(default_path()),
        }
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let command = Command::parse(std::env::args_os().skip(1));

    // Only the log format is read ahead of tracing; `load_from` reports the
    // full outcome once logging is up.
    let log_json = match &command {
        Command::Run(path) => EngineConfig::try_load_from(path).is_ok_and(|c| c.log_json),
        Command::WriteConfig(_) => false,
    };

    // Initialize tracing
    let filter = EnvFilter::from_default_env().add_directive("ember=info".parse()?);
    if log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    info!("Ember starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    match command {
        Command::WriteConfig(path) => EngineConfig::default().save_to(path)?,
        Command::Run(path) => {
            let config = EngineConfig::load_from(path);
            app::run(&config)?;
        },
    }

    info!("Ember shutdown complete");
    Ok(())
}
