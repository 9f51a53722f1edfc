mod commands;
mod completion;
mod config;
mod dice;
mod discord_bot;
mod file_logger;
mod history;
mod models;
mod mood_engine;
mod moods;
mod phrases;
mod relay;
mod session;

use crate::completion::OpenAiClient;
use crate::config::Config;
use crate::discord_bot::DiscordService;
use crate::file_logger::FileLogger;
use crate::models::ModelCatalog;
use crate::moods::MoodTable;
use crate::phrases::PhraseSets;
use crate::relay::{AccessList, Relay};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let moods = MoodTable::load(&config.moods_path)?;
    let phrases = PhraseSets::load(&config.phrases_path)?;
    let catalog = ModelCatalog::load(&config.models_path)?;
    info!(
        "Loaded {} models, starting with {}",
        catalog.models.len(),
        catalog.model
    );

    let driver = Arc::new(OpenAiClient::new(
        &config.openai_endpoint,
        &config.openai_api_key,
    ));
    let access = AccessList::new(
        config.whitelisted_ids.iter().copied(),
        config.privileged_ids.iter().copied(),
    );

    let mut relay = Relay::new(
        moods,
        phrases,
        catalog,
        access,
        config.discord_client_id,
        driver,
    )
    .with_timeout(config.completion_timeout);

    if let Some(path) = &config.log_file {
        match FileLogger::new(path) {
            Ok(logger) => relay = relay.with_transcript(logger),
            Err(e) => warn!("Transcript log {} unavailable: {}", path, e),
        }
    }

    info!("Chappie is connecting to Discord (AI starts disabled)");
    DiscordService::new(Arc::new(relay), config.discord_guild_id)
        .run(&config.discord_token)
        .await
}
