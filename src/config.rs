use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default = "default_downloader_config")]
    pub downloader: DownloaderConfig,
    #[serde(default = "default_health_config")]
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DownloaderConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_url() -> String {
    "https://socialdownloder2.anshapi.workers.dev/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_port() -> u16 {
    10000
}

fn default_downloader_config() -> DownloaderConfig {
    DownloaderConfig {
        api_url: default_api_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_health_config() -> HealthConfig {
    HealthConfig {
        port: default_port(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            downloader: default_downloader_config(),
            health: default_health_config(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist. `TELEGRAM_BOT_TOKEN` and `PORT` environment
    /// variables override the file; the bot token must come from one of the
    /// two sources.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_overrides(
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            std::env::var("PORT").ok(),
        );

        if config.telegram.bot_token.is_empty() {
            anyhow::bail!(
                "Bot token is not set; provide [telegram] bot_token in the config file \
                 or the TELEGRAM_BOT_TOKEN environment variable"
            );
        }

        Ok(config)
    }

    fn apply_overrides(&mut self, bot_token: Option<String>, port: Option<String>) {
        if let Some(token) = bot_token.filter(|t| !t.is_empty()) {
            self.telegram.bot_token = token;
        }
        if let Some(port) = port.and_then(|p| p.parse().ok()) {
            self.health.port = port;
        }
    }
}
