//! Main menu

use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode, WebAppInfo};
use tracing::{debug, warn};
use url::Url;
use crate::config::BotConfig;
use crate::handlers::texts;
use crate::utils::errors::Result;

pub const PAGE_SEARCH: &str = "drama.html";
pub const PAGE_REFERRAL: &str = "referal.html";
pub const PAGE_PAYMENT: &str = "payment.html";
pub const PAGE_REQUEST: &str = "request.html";

fn web_app_button(config: &BotConfig, text: &str, page: &str) -> Result<InlineKeyboardButton> {
    let url = Url::parse(&config.webapp_page(page))?;
    Ok(InlineKeyboardButton::web_app(text, WebAppInfo { url }))
}

/// Inline keyboard shown under the welcome poster
pub fn main_menu_keyboard(config: &BotConfig) -> Result<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url(
            texts::BUTTON_OFFICIAL_GROUP,
            Url::parse(&config.official_group_url)?,
        )],
        vec![
            web_app_button(config, texts::BUTTON_SEARCH, PAGE_SEARCH)?,
            web_app_button(config, texts::BUTTON_REFERRAL, PAGE_REFERRAL)?,
        ],
        vec![
            web_app_button(config, texts::BUTTON_BUY_VIP, PAGE_PAYMENT)?,
            web_app_button(config, texts::BUTTON_REQUEST, PAGE_REQUEST)?,
        ],
        vec![InlineKeyboardButton::url(
            texts::BUTTON_CONTACT,
            Url::parse(&config.support_url)?,
        )],
    ]))
}

/// Single "buy VIP" button attached to the upsell message
pub fn upgrade_vip_keyboard(config: &BotConfig) -> Result<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![vec![web_app_button(
        config,
        texts::BUTTON_UPGRADE_VIP,
        PAGE_PAYMENT,
    )?]]))
}

/// Send the poster with the menu, or a text caption when there is no poster
pub async fn send_main_menu(bot: &Bot, chat_id: ChatId, config: &BotConfig) -> Result<()> {
    let keyboard = main_menu_keyboard(config)?;

    let poster = config.poster_path.as_deref().filter(|path| Path::new(path).exists());
    let sent = match poster {
        Some(path) => {
            debug!(chat_id = ?chat_id, poster = path, "Sending menu with poster");
            bot.send_photo(chat_id, InputFile::file(path))
                .caption(texts::MENU_CAPTION)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard.clone())
                .await
        }
        None => {
            bot.send_message(chat_id, texts::MENU_CAPTION)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard.clone())
                .await
        }
    };

    if let Err(e) = sent {
        warn!(chat_id = ?chat_id, error = %e, "Failed to send main menu, retrying as plain text");
        bot.send_message(chat_id, texts::MENU_FALLBACK)
            .reply_markup(keyboard)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_menu_layout() {
        let config = Settings::default().bot;
        let keyboard = main_menu_keyboard(&config).unwrap();

        let rows: Vec<usize> = keyboard.inline_keyboard.iter().map(Vec::len).collect();
        assert_eq!(rows, vec![1, 2, 2, 1]);

        let web_apps: Vec<String> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::WebApp(info) => Some(info.url.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            web_apps,
            vec![
                "https://dramamuid.netlify.app/drama.html",
                "https://dramamuid.netlify.app/referal.html",
                "https://dramamuid.netlify.app/payment.html",
                "https://dramamuid.netlify.app/request.html",
            ]
        );
    }

    #[test]
    fn test_invalid_group_url_is_an_error() {
        let mut config = Settings::default().bot;
        config.official_group_url = "not a url".to_string();
        assert!(main_menu_keyboard(&config).is_err());
    }
}
