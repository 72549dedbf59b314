use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub bot_token: String,
    /// Bot handle recorded on action events (e.g. "rumormill_bot").
    pub bot_username: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            bot_token: env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?,
            bot_username: env::var("BOT_USERNAME").context("BOT_USERNAME must be set")?,
        })
    }
}
