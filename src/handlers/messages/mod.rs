//! Message handlers module
//!
//! Handles data sent back by the Mini App through `Telegram.WebApp.sendData`
//! and plain text messages.

mod actions;

pub use actions::WebAppAction;

use std::sync::Arc;
use teloxide::{Bot, types::{ChatId, Message}, prelude::*};
use tracing::{debug, info, warn};
use crate::config::Settings;
use crate::handlers::{menu, texts};
use crate::middleware::RateLimitMiddleware;
use crate::services::{DeliveryOutcome, ServiceFactory};
use crate::utils::errors::{DramamuError, Result};
use crate::utils::helpers::{format_rupiah, truncate_text};
use crate::utils::logging::log_user_action;

/// Handle a Web App data message
pub async fn handle_web_app_data(
    bot: Bot,
    msg: Message,
    data: String,
    services: Arc<ServiceFactory>,
    settings: Arc<Settings>,
    limiter: Arc<RateLimitMiddleware<i64>>,
) -> Result<()> {
    let chat_id = msg.chat.id;
    if data.trim().is_empty() {
        warn!(chat_id = ?chat_id, "Empty Web App data received");
        return Ok(());
    }

    info!(chat_id = ?chat_id, data = %truncate_text(&data, 100), "Web App data received");

    if limiter.check(&chat_id.0).is_err() {
        bot.send_message(chat_id, texts::TOO_MANY_REQUESTS).await?;
        return Ok(());
    }

    let action = match WebAppAction::parse(&data) {
        Ok(action) => action,
        Err(e) => {
            warn!(chat_id = ?chat_id, error = %e, "Invalid JSON from Web App");
            bot.send_message(chat_id, texts::INVALID_WEBAPP_DATA).await?;
            return Ok(());
        }
    };

    match action {
        WebAppAction::Watch { movie_id } => handle_watch(&bot, chat_id, movie_id, &services, &settings).await,
        WebAppAction::RequestDrama { title, app } => {
            log_user_action(chat_id.0, "request_drama", Some(&format!("{} from {}", title, app)));
            bot.send_message(chat_id, texts::drama_request_received(&title)).await?;
            Ok(())
        }
        WebAppAction::WithdrawReferral(mut body) => {
            body.telegram_id = Some(actions::chat_id_field(chat_id));
            let request = match body.into_withdrawal() {
                Ok(request) => request,
                Err(e) => {
                    debug!(chat_id = ?chat_id, error = %e, "Rejected withdrawal data");
                    bot.send_message(chat_id, texts::INVALID_WITHDRAWAL).await?;
                    return Ok(());
                }
            };

            match services.user_service.submit_withdrawal(request).await {
                Ok(withdrawal) => {
                    let text = texts::withdrawal_received(
                        &format_rupiah(withdrawal.amount),
                        &withdrawal.method,
                        &withdrawal.account_name,
                        &withdrawal.account_number,
                    );
                    bot.send_message(chat_id, text).await?;
                    Ok(())
                }
                Err(DramamuError::InvalidInput(_)) => {
                    bot.send_message(chat_id, texts::INVALID_WITHDRAWAL).await?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        WebAppAction::Unknown(action) => {
            warn!(chat_id = ?chat_id, action = ?action, "Unknown action from Web App");
            bot.send_message(chat_id, texts::UNKNOWN_ACTION).await?;
            Ok(())
        }
    }
}

async fn handle_watch(
    bot: &Bot,
    chat_id: ChatId,
    movie_id: Option<i64>,
    services: &ServiceFactory,
    settings: &Settings,
) -> Result<()> {
    let Some(movie_id) = movie_id.filter(|id| *id > 0) else {
        bot.send_message(chat_id, texts::INVALID_MOVIE).await?;
        return Ok(());
    };

    match services.delivery_service.deliver_to_chat(chat_id.0, movie_id).await {
        Ok(DeliveryOutcome::NotEntitled { .. }) => {
            bot.send_message(chat_id, texts::NOT_VIP)
                .reply_markup(menu::upgrade_vip_keyboard(&settings.bot)?)
                .await?;
        }
        Ok(DeliveryOutcome::Undelivered) => {
            bot.send_message(chat_id, texts::DELIVERY_FAILED).await?;
        }
        Ok(_) => {}
        Err(DramamuError::MovieNotFound { .. }) => {
            bot.send_message(chat_id, texts::MOVIE_NOT_FOUND).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Point plain text messages at the menu
pub async fn handle_text(bot: Bot, msg: Message) -> Result<()> {
    if let Some(text) = msg.text() {
        debug!(chat_id = ?msg.chat.id, text = %truncate_text(text, 100), "Text message received");
    }
    bot.send_message(msg.chat.id, texts::USE_START).await?;
    Ok(())
}
