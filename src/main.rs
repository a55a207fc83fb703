/// Checks for permission to trigger an alert
pub mod checks;
/// All available discord commands
mod commands;
/// Confirm/cancel view with a bounded wait
mod confirm;
/// Alert dispatching to the configured channel
mod dispatch;
/// discord setup
mod discord;
/// Liveness endpoint for uptime monitors
mod keep_alive;
mod logger;
/// Bot settings
mod settings;

use anyhow::{Context, Result};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init()?;

    let settings = Settings::new().context("Failed to load settings from the environment.")?;
    settings.validate()?;
    settings.log_status();

    keep_alive::spawn(settings.web_port);

    discord::run(settings).await.context("Failed to start discord.")
}
