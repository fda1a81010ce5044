//! Error handling for Dramamu
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the Dramamu backend
#[derive(Error, Debug)]
pub enum DramamuError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("User ID mismatch: request claims {claimed}, initData is signed for {signed}")]
    IdentityMismatch { claimed: i64, signed: i64 },

    #[error("Movie not found: {movie_id}")]
    MovieNotFound { movie_id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for Dramamu operations
pub type Result<T> = std::result::Result<T, DramamuError>;

impl DramamuError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            DramamuError::Database(_) => false,
            DramamuError::Migration(_) => false,
            DramamuError::Telegram(_) => true,
            DramamuError::Http(_) => true,
            DramamuError::Config(_) => false,
            DramamuError::ConfigLoad(_) => false,
            DramamuError::Authentication(_) => false,
            DramamuError::IdentityMismatch { .. } => false,
            DramamuError::MovieNotFound { .. } => false,
            DramamuError::Conflict(_) => true,
            DramamuError::Timeout(_) => true,
            DramamuError::Serialization(_) => false,
            DramamuError::Io(_) => true,
            DramamuError::UrlParse(_) => false,
            DramamuError::RateLimitExceeded => true,
            DramamuError::InvalidInput(_) => false,
            DramamuError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DramamuError::Database(_) => ErrorSeverity::Critical,
            DramamuError::Migration(_) => ErrorSeverity::Critical,
            DramamuError::Config(_) => ErrorSeverity::Critical,
            DramamuError::ConfigLoad(_) => ErrorSeverity::Critical,
            DramamuError::Authentication(_) => ErrorSeverity::Warning,
            DramamuError::IdentityMismatch { .. } => ErrorSeverity::Warning,
            DramamuError::RateLimitExceeded => ErrorSeverity::Warning,
            DramamuError::MovieNotFound { .. } => ErrorSeverity::Info,
            DramamuError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// True when the storage layer rejected a write because of a uniqueness constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DramamuError::Conflict(_) => true,
            DramamuError::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
