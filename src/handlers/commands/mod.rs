//! Command handlers module
//!
//! This module contains handlers for the bot commands

pub mod help;
pub mod start;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::config::Settings;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Dramamu commands:")]
pub enum Command {
    #[command(description = "Open the main menu (optionally with a start token)")]
    Start(String),
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    settings: Arc<Settings>,
) -> Result<()> {
    match cmd {
        Command::Start(payload) => start::handle_start(bot, msg, payload, &services, &settings.bot).await,
        Command::Help => help::handle_help(bot, msg).await,
    }
}
