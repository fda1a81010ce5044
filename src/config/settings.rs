//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::net::SocketAddr;
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Bot API token; also the shared secret behind initData signatures
    pub token: String,
    /// Username used to build `https://t.me/<username>?start=<token>` links
    pub username: String,
    /// Base URL of the Mini App pages
    pub webapp_url: String,
    pub official_group_url: String,
    pub support_url: String,
    pub poster_path: Option<String>,
    /// Chat that receives handler error reports
    pub admin_id: Option<i64>,
    pub run_polling: bool,
}

/// HTTP API and delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    /// Reject movie requests whose initData does not verify
    pub require_valid_init_data: bool,
    pub delivery_timeout_seconds: u64,
    pub pending_ttl_minutes: i64,
    pub rate_limit_per_minute: u32,
    pub allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for a daily-rolling log file; stdout only when unset
    pub file_dir: Option<String>,
    pub json: bool,
}

impl Settings {
    /// Load settings from defaults, an optional `config.toml` and `DRAMAMU_*` environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings with an explicit file source layered over the defaults
    pub fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("DRAMAMU")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::DramamuError> {
        super::validation::validate_settings(self)
    }
}

impl BotConfig {
    /// Build a Mini App page URL from the configured base
    pub fn webapp_page(&self, page: &str) -> String {
        format!("{}/{}", self.webapp_url.trim_end_matches('/'), page)
    }

    /// Deep link that opens the bot with a `/start <payload>` command
    pub fn start_link(&self, payload: &str) -> String {
        format!("https://t.me/{}?start={}", self.username, payload)
    }
}

impl ApiConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_seconds)
    }

    pub fn pending_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.pending_ttl_minutes)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                username: "dramamu_bot".to_string(),
                webapp_url: "https://dramamuid.netlify.app".to_string(),
                official_group_url: "https://t.me/dramamuofficial".to_string(),
                support_url: "https://t.me/kot_dik".to_string(),
                poster_path: Some("poster.jpg".to_string()),
                admin_id: None,
                run_polling: true,
            },
            api: ApiConfig {
                listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
                require_valid_init_data: true,
                delivery_timeout_seconds: 30,
                pending_ttl_minutes: 15,
                rate_limit_per_minute: 30,
                allowed_origins: vec![],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/dramamu".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_dir: None,
                json: false,
            },
        }
    }
}
