//! Movie delivery orchestration
//!
//! A delivery request moves through: initData verification, identity check,
//! movie lookup, entitlement check, then delivery. Delivery tries a video,
//! then a text message carrying the link; when both fail the request is parked
//! as a pending action and the caller gets a `/start` deep link to finish it.
//!
//! Every Bot API call runs under the configured timeout and inside the
//! caller's future, so dropping the request future cancels the call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use teloxide::utils::html;
use tracing::{error, info, warn};
use crate::config::{ApiConfig, BotConfig};
use crate::database::{ActivityStore, MovieStore};
use crate::models::{CreateActivityLogRequest, Movie, RedeemedAction};
use crate::services::entitlement::EntitlementService;
use crate::services::init_data::InitDataVerifier;
use crate::services::messenger::Messenger;
use crate::services::pending::PendingActionLedger;
use crate::utils::errors::{DramamuError, Result};
use crate::utils::logging::log_delivery;

/// A movie request coming from the Mini App
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub chat_id: i64,
    pub movie_id: i64,
    pub init_data: String,
}

/// How the movie reached the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Video,
    TextLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { movie_title: String, channel: DeliveryChannel },
    /// The user must buy VIP first; nothing was sent
    NotEntitled { movie_title: String },
    /// Both sends failed; the user finishes through `/start <token>`
    FallbackIssued { link: String, token: String },
    /// Both sends failed and no fallback could be issued
    Undelivered,
}

impl DeliveryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered { .. } => "delivered",
            DeliveryOutcome::NotEntitled { .. } => "not_entitled",
            DeliveryOutcome::FallbackIssued { .. } => "fallback_issued",
            DeliveryOutcome::Undelivered => "undelivered",
        }
    }
}

#[derive(Clone)]
pub struct MovieDeliveryService {
    verifier: InitDataVerifier,
    entitlements: EntitlementService,
    movies: Arc<dyn MovieStore>,
    ledger: PendingActionLedger,
    activity: Arc<dyn ActivityStore>,
    messenger: Arc<dyn Messenger>,
    bot: BotConfig,
    require_valid_init_data: bool,
    send_timeout: Duration,
}

impl MovieDeliveryService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        verifier: InitDataVerifier,
        entitlements: EntitlementService,
        movies: Arc<dyn MovieStore>,
        ledger: PendingActionLedger,
        activity: Arc<dyn ActivityStore>,
        messenger: Arc<dyn Messenger>,
        bot: BotConfig,
        api: &ApiConfig,
    ) -> Self {
        Self {
            verifier,
            entitlements,
            movies,
            ledger,
            activity,
            messenger,
            bot,
            require_valid_init_data: api.require_valid_init_data,
            send_timeout: api.delivery_timeout(),
        }
    }

    /// Handle a Mini App movie request end to end
    pub async fn request_delivery(&self, request: &DeliveryRequest) -> Result<DeliveryOutcome> {
        match self.verifier.verify(&request.init_data) {
            Some(user) if user.id != request.chat_id => {
                warn!(chat_id = request.chat_id, signed_id = user.id, "initData identity does not match chat");
                return Err(DramamuError::IdentityMismatch {
                    claimed: request.chat_id,
                    signed: user.id,
                });
            }
            Some(_) => {}
            None if self.require_valid_init_data => {
                warn!(chat_id = request.chat_id, "Rejecting request with invalid initData");
                return Err(DramamuError::Authentication("Invalid init_data".to_string()));
            }
            None => {
                warn!(chat_id = request.chat_id, "Invalid initData, continuing because strict mode is off");
            }
        }

        let movie = self.find_movie(request.movie_id).await?;

        if !self.entitlements.is_vip(request.chat_id).await {
            log_delivery(request.chat_id, movie.id, "not_entitled");
            return Ok(DeliveryOutcome::NotEntitled { movie_title: movie.title });
        }

        if let Some(channel) = self.send_movie(request.chat_id, &movie).await {
            self.record_watch(request.chat_id, movie.id).await;
            log_delivery(request.chat_id, movie.id, "delivered");
            return Ok(DeliveryOutcome::Delivered { movie_title: movie.title, channel });
        }

        let outcome = match self.ledger.create(request.chat_id, movie.id).await {
            Ok(token) => DeliveryOutcome::FallbackIssued {
                link: self.bot.start_link(&token),
                token,
            },
            Err(e) => {
                error!(chat_id = request.chat_id, movie_id = movie.id, error = %e, "Failed to create pending action");
                DeliveryOutcome::Undelivered
            }
        };
        log_delivery(request.chat_id, movie.id, outcome.label());
        Ok(outcome)
    }

    /// Deliver to a chat the bot already knows (Web App data sent through Telegram)
    pub async fn deliver_to_chat(&self, chat_id: i64, movie_id: i64) -> Result<DeliveryOutcome> {
        let movie = self.find_movie(movie_id).await?;
        if !self.entitlements.is_vip(chat_id).await {
            return Ok(DeliveryOutcome::NotEntitled { movie_title: movie.title });
        }

        let outcome = match self.send_movie(chat_id, &movie).await {
            Some(channel) => {
                self.record_watch(chat_id, movie.id).await;
                DeliveryOutcome::Delivered { movie_title: movie.title, channel }
            }
            None => DeliveryOutcome::Undelivered,
        };
        log_delivery(chat_id, movie_id, outcome.label());
        Ok(outcome)
    }

    /// Redeem a start token and deliver the movie it was issued for.
    ///
    /// Returns `None` when the token is unknown, expired or already used.
    pub async fn redeem_and_deliver(&self, token: &str) -> Result<Option<(RedeemedAction, DeliveryOutcome)>> {
        let Some(action) = self.ledger.redeem(token).await? else {
            return Ok(None);
        };

        let movie = self.find_movie(action.movie_id).await?;
        let outcome = match self.send_movie(action.telegram_id, &movie).await {
            Some(channel) => {
                self.record_watch(action.telegram_id, movie.id).await;
                DeliveryOutcome::Delivered { movie_title: movie.title, channel }
            }
            None => DeliveryOutcome::Undelivered,
        };
        log_delivery(action.telegram_id, action.movie_id, outcome.label());
        Ok(Some((action, outcome)))
    }

    pub fn ledger(&self) -> &PendingActionLedger {
        &self.ledger
    }

    async fn find_movie(&self, movie_id: i64) -> Result<Movie> {
        self.movies
            .find_by_id(movie_id)
            .await?
            .ok_or(DramamuError::MovieNotFound { movie_id })
    }

    /// Video first, then the link as text; `None` when both are rejected
    async fn send_movie(&self, chat_id: i64, movie: &Movie) -> Option<DeliveryChannel> {
        let caption = video_caption(movie);
        match self.bounded("sendVideo", self.messenger.send_video(chat_id, &movie.video_link, &caption)).await {
            Ok(()) => return Some(DeliveryChannel::Video),
            Err(e) => warn!(chat_id = chat_id, movie_id = movie.id, error = %e, "Sending video failed, falling back to link"),
        }

        match self.bounded("sendMessage", self.messenger.send_text(chat_id, &link_text(movie))).await {
            Ok(()) => Some(DeliveryChannel::TextLink),
            Err(e) => {
                warn!(chat_id = chat_id, movie_id = movie.id, error = %e, "Sending link failed");
                None
            }
        }
    }

    async fn bounded<F>(&self, call: &str, send: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        tokio::time::timeout(self.send_timeout, send)
            .await
            .map_err(|_| DramamuError::Timeout(format!("{} after {:?}", call, self.send_timeout)))?
    }

    async fn record_watch(&self, telegram_id: i64, movie_id: i64) {
        let request = CreateActivityLogRequest {
            telegram_id,
            action: "watch".to_string(),
            movie_id: Some(movie_id),
            status: "success".to_string(),
        };
        match self.activity.record(request).await {
            Ok(_) => info!(telegram_id = telegram_id, movie_id = movie_id, "Watch recorded"),
            Err(e) => warn!(telegram_id = telegram_id, movie_id = movie_id, error = %e, "Failed to record watch"),
        }
    }
}

fn video_caption(movie: &Movie) -> String {
    format!("🎥 <b>{}</b>", html::escape(&movie.title))
}

fn link_text(movie: &Movie) -> String {
    format!("🎬 <b>{}</b>\n\n{}", html::escape(&movie.title), html::escape(&movie.video_link))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, video_link: &str) -> Movie {
        Movie {
            id: 1,
            title: title.to_string(),
            description: None,
            poster_url: None,
            video_link: video_link.to_string(),
        }
    }

    #[test]
    fn test_titles_are_html_escaped() {
        let movie = movie("Tom & Jerry <3", "https://cdn.example/v.mp4?a=1&b=2");

        assert_eq!(video_caption(&movie), "🎥 <b>Tom &amp; Jerry &lt;3</b>");
        assert_eq!(
            link_text(&movie),
            "🎬 <b>Tom &amp; Jerry &lt;3</b>\n\nhttps://cdn.example/v.mp4?a=1&amp;b=2"
        );
    }

    #[test]
    fn test_plain_titles_are_unchanged() {
        assert_eq!(video_caption(&movie("plain", "https://cdn.example/v.mp4")), "🎥 <b>plain</b>");
    }
}
