//! Start command handler
//!
//! `/start` shows the main menu. A payload is a start token issued when a Mini
//! App delivery could not reach the chat; it is redeemed here and the movie is
//! sent before the menu.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, info, warn};
use crate::config::BotConfig;
use crate::handlers::{menu, texts};
use crate::services::{DeliveryOutcome, ServiceFactory};
use crate::utils::errors::{DramamuError, Result};
use crate::utils::logging::log_user_action;

/// Handle /start command
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    payload: String,
    services: &ServiceFactory,
    config: &BotConfig,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().map(|user| user.id.0 as i64);
    debug!(user_id = ?user_id, chat_id = ?chat_id, "Processing /start command");

    let token = payload.trim();
    if !token.is_empty() {
        redeem_start_token(&bot, &msg, token, services).await?;
    }

    if let Some(user_id) = user_id {
        log_user_action(user_id, "start", None);
    }
    menu::send_main_menu(&bot, chat_id, config).await
}

async fn redeem_start_token(bot: &Bot, msg: &Message, token: &str, services: &ServiceFactory) -> Result<()> {
    let chat_id = msg.chat.id;

    match services.delivery_service.redeem_and_deliver(token).await {
        Ok(Some((action, outcome))) => {
            if action.telegram_id != chat_id.0 {
                warn!(
                    chat_id = ?chat_id,
                    telegram_id = action.telegram_id,
                    "Start token opened from a different chat"
                );
            }
            info!(telegram_id = action.telegram_id, movie_id = action.movie_id, outcome = outcome.label(), "Start token redeemed");
            if outcome == DeliveryOutcome::Undelivered {
                bot.send_message(chat_id, texts::DELIVERY_FAILED).await?;
            }
        }
        Ok(None) => {
            bot.send_message(chat_id, texts::TOKEN_INVALID).await?;
        }
        Err(DramamuError::MovieNotFound { movie_id }) => {
            warn!(movie_id = movie_id, "Redeemed token points at a missing movie");
            bot.send_message(chat_id, texts::MOVIE_NOT_FOUND).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
