//! Outbound messaging
//!
//! The delivery flow only needs two Bot API calls, so they sit behind a small
//! trait. `TelegramMessenger` implements it with teloxide.

use std::time::Duration;
use async_trait::async_trait;
use teloxide::{prelude::*, types::{ChatId, InputFile, ParseMode}};
use tracing::debug;
use crate::utils::errors::{DramamuError, Result};

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a video by URL with an HTML caption
    async fn send_video(&self, chat_id: i64, video_url: &str, caption: &str) -> Result<()>;

    /// Send an HTML text message
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Bot API messenger
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_video(&self, chat_id: i64, video_url: &str, caption: &str) -> Result<()> {
        let url = url::Url::parse(video_url)?;
        debug!(chat_id = chat_id, "Sending video");
        self.bot
            .send_video(ChatId(chat_id), InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        debug!(chat_id = chat_id, "Sending text message");
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Build a bot whose HTTP client gives up on any request after `timeout`
pub fn build_bot(token: &str, timeout: Duration) -> Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(timeout)
        .build()
        .map_err(DramamuError::Http)?;
    Ok(Bot::with_client(token, client))
}
