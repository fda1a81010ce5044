//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for `/start` and `/help`
//! - Message handlers for Mini App data and plain text
//! - The main menu and user-facing texts

pub mod commands;
pub mod menu;
pub mod messages;
pub mod texts;

use std::sync::Arc;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{error, warn};
use crate::config::Settings;
use crate::middleware::RateLimitMiddleware;
use crate::services::ServiceFactory;
use crate::utils::errors::{DramamuError, Result};

pub use commands::Command;

/// Create the main update handler
pub fn schema() -> UpdateHandler<DramamuError> {
    Update::filter_message()
        .branch(
            // Mini App data arrives as a service message without text
            dptree::filter_map(|msg: Message| msg.web_app_data().map(|data| data.data.clone()))
                .endpoint(web_app_data_endpoint),
        )
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_endpoint),
        )
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(text_endpoint))
}

async fn command_endpoint(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    settings: Arc<Settings>,
) -> Result<()> {
    let result = commands::handle_command(bot.clone(), msg, cmd, services, settings.clone()).await;
    report_failure(&bot, &settings, result).await
}

async fn web_app_data_endpoint(
    bot: Bot,
    msg: Message,
    data: String,
    services: Arc<ServiceFactory>,
    settings: Arc<Settings>,
    limiter: Arc<RateLimitMiddleware<i64>>,
) -> Result<()> {
    let result = messages::handle_web_app_data(bot.clone(), msg, data, services, settings.clone(), limiter).await;
    report_failure(&bot, &settings, result).await
}

async fn text_endpoint(bot: Bot, msg: Message, settings: Arc<Settings>) -> Result<()> {
    let result = messages::handle_text(bot.clone(), msg).await;
    report_failure(&bot, &settings, result).await
}

/// Log a failed handler; failures that will not go away on retry also go to the admin chat
async fn report_failure(bot: &Bot, settings: &Settings, result: Result<()>) -> Result<()> {
    let Err(e) = &result else {
        return result;
    };

    error!(error = %e, severity = %e.severity(), "Error handling update");
    if e.is_recoverable() {
        return result;
    }
    if let Some(admin_id) = settings.bot.admin_id {
        if let Err(send_error) = bot
            .send_message(ChatId(admin_id), texts::admin_error_report(&e.to_string()))
            .await
        {
            warn!(admin_id = admin_id, error = %send_error, "Failed to notify admin");
        }
    }

    result
}
