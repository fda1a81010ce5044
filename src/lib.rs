//! Dramamu backend
//!
//! Backend for a movie-streaming Telegram Mini App: a JSON API for the Mini App
//! pages and a Telegram bot that shows the menu and delivers VIP movies.
//! Movie requests are authenticated with Telegram `initData`; deliveries that
//! cannot reach the chat are parked behind single-use `/start` tokens.

pub mod api;
pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Settings;
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use utils::errors::{DramamuError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `dramamu vX.Y.Z`, logged at startup
pub fn info() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), VERSION)
}
