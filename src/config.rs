use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("mood table has no 'default' entry")]
    MissingDefaultMood,
    #[error("active model '{0}' is not in the model catalog")]
    UnknownActiveModel(String),
    #[error("invalid user id '{0}'")]
    InvalidId(String),
}

pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: u64,
    pub discord_client_id: u64,
    pub openai_api_key: String,
    pub openai_endpoint: String,
    pub whitelisted_ids: Vec<u64>,
    pub privileged_ids: Vec<u64>,
    pub moods_path: PathBuf,
    pub phrases_path: PathBuf,
    pub models_path: PathBuf,
    pub completion_timeout: Duration,
    pub log_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let discord_token = env::var("DISCORD_TOKEN").map_err(|_| "DISCORD_TOKEN must be set")?;
        let discord_guild_id = env::var("DISCORD_GUILD_ID")
            .map_err(|_| "DISCORD_GUILD_ID must be set")?
            .parse()?;
        let discord_client_id = env::var("DISCORD_CLIENT_ID")
            .map_err(|_| "DISCORD_CLIENT_ID must be set")?
            .parse()?;

        let openai_api_key = env::var("OPENAI_API_KEY").map_err(|_| "OPENAI_API_KEY must be set")?;
        let openai_endpoint = env::var("OPENAI_ENDPOINT")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let whitelisted_ids = parse_id_list(&env::var("WHITELISTED_IDS").unwrap_or_default())?;
        let privileged_ids = parse_id_list(&env::var("PRIVILEGED_IDS").unwrap_or_default())?;

        let moods_path = env::var("CHAPPIE_MOODS")
            .unwrap_or_else(|_| "config/bot-moods.json".to_string())
            .into();
        let phrases_path = env::var("CHAPPIE_PHRASES")
            .unwrap_or_else(|_| "config/phrases.json".to_string())
            .into();
        let models_path = env::var("CHAPPIE_MODELS")
            .unwrap_or_else(|_| "config/openai.json".to_string())
            .into();

        let timeout_secs = match env::var("COMPLETION_TIMEOUT_SECS") {
            Ok(raw) => raw.parse()?,
            Err(_) => 30,
        };
        let log_file = env::var("CHAPPIE_LOG_FILE").ok().filter(|p| !p.is_empty());

        Ok(Self {
            discord_token,
            discord_guild_id,
            discord_client_id,
            openai_api_key,
            openai_endpoint,
            whitelisted_ids,
            privileged_ids,
            moods_path,
            phrases_path,
            models_path,
            completion_timeout: Duration::from_secs(timeout_secs),
            log_file,
        })
    }
}

/// Parses a comma-separated list of numeric user ids. Blank items are skipped.
pub fn parse_id_list(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().map_err(|_| ConfigError::InvalidId(item.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 22 ,333").unwrap(), vec![1, 22, 333]);
        assert_eq!(parse_id_list("").unwrap(), Vec::<u64>::new());
        assert_eq!(parse_id_list("7,,").unwrap(), vec![7]);
    }

    #[test]
    fn test_parse_id_list_rejects_garbage() {
        let err = parse_id_list("12,abc").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidId(ref id) if id == "abc"));
    }
}
