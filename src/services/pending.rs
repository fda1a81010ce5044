//! Pending action ledger
//!
//! Issues single-use, time-limited start tokens for deliveries that could not
//! be completed immediately, and redeems them exactly once.

use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use crate::database::PendingActionStore;
use crate::models::{CreatePendingActionRequest, RedeemedAction};
use crate::utils::errors::{DramamuError, Result};
use crate::utils::helpers::generate_start_token;

/// Token generation attempts before a collision is reported as a conflict
const MAX_TOKEN_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PendingActionLedger {
    store: Arc<dyn PendingActionStore>,
    ttl: Duration,
}

impl PendingActionLedger {
    pub fn new(store: Arc<dyn PendingActionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Record a deferred delivery and return its start token
    pub async fn create(&self, telegram_id: i64, movie_id: i64) -> Result<String> {
        self.create_at(telegram_id, movie_id, Utc::now()).await
    }

    pub async fn create_at(&self, telegram_id: i64, movie_id: i64, now: DateTime<Utc>) -> Result<String> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let request = CreatePendingActionRequest {
                telegram_id,
                movie_id,
                start_token: generate_start_token(),
                expires_at: now + self.ttl,
            };

            match self.store.create(request).await {
                Ok(action) => {
                    info!(
                        telegram_id = telegram_id,
                        movie_id = movie_id,
                        expires_at = %action.expires_at,
                        "Pending action created"
                    );
                    return Ok(action.start_token);
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(attempt = attempt, "Start token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DramamuError::Conflict(
            "could not generate a unique start token".to_string(),
        ))
    }

    /// Consume a token; `None` when unknown, expired or already redeemed
    pub async fn redeem(&self, token: &str) -> Result<Option<RedeemedAction>> {
        self.redeem_at(token, Utc::now()).await
    }

    pub async fn redeem_at(&self, token: &str, now: DateTime<Utc>) -> Result<Option<RedeemedAction>> {
        let redeemed = self.store.redeem(token, now).await?;
        match &redeemed {
            Some(action) => info!(telegram_id = action.telegram_id, movie_id = action.movie_id, "Pending action redeemed"),
            None => debug!("Start token invalid, expired or already redeemed"),
        }
        Ok(redeemed.as_ref().map(RedeemedAction::from))
    }

    /// Check a token without consuming it
    pub async fn lookup(&self, token: &str) -> Result<Option<RedeemedAction>> {
        self.lookup_at(token, Utc::now()).await
    }

    pub async fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> Result<Option<RedeemedAction>> {
        let action = self.store.find_valid(token, now).await?;
        Ok(action.as_ref().map(RedeemedAction::from))
    }
}
