//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{DramamuError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_api_config(&settings.api)?;
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(DramamuError::Config(
            "Bot token is required".to_string()
        ));
    }

    let username_ok = !config.username.is_empty()
        && config.username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !username_ok {
        return Err(DramamuError::Config(
            format!("Invalid bot username: {:?}", config.username)
        ));
    }

    url::Url::parse(&config.webapp_url)?;

    Ok(())
}

/// Validate API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.delivery_timeout_seconds == 0 {
        return Err(DramamuError::Config(
            "Delivery timeout must be greater than 0".to_string()
        ));
    }

    if config.pending_ttl_minutes <= 0 {
        return Err(DramamuError::Config(
            "Pending action TTL must be greater than 0".to_string()
        ));
    }

    if config.rate_limit_per_minute == 0 {
        return Err(DramamuError::Config(
            "Rate limit must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(DramamuError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(DramamuError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(DramamuError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(DramamuError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(DramamuError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
