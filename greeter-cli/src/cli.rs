use anyhow::Context;
use clap::Parser;
use greeter_core::{AppConfig, FileProfileStore, SessionController, provider_from_config};
use tracing::{debug, info};

use crate::terminal::TerminalConsole;

/// Top-level CLI struct. Takes no arguments beyond `--help` and `--version`.
#[derive(Debug, Parser)]
#[command(
    name = "weather-greeter",
    version,
    about = "Greets you, remembers your city and shows its current weather"
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = AppConfig::from_env()?;
        debug!(?config, "configuration loaded");

        // Nothing is prompted before storage is known to be usable.
        let store = FileProfileStore::initialize(&config.profile_path)
            .context("Cannot start without profile storage")?;

        let weather =
            provider_from_config(&config).context("Failed to construct weather client")?;

        let mut session = SessionController::new(store, weather, TerminalConsole::new());
        let summary = session.run().await?;

        info!(?summary.final_state, summary.menu_iterations, "bye");
        Ok(())
    }
}
