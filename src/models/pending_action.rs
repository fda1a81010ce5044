//! Pending action model
//!
//! A pending action records a movie delivery that could not be completed
//! immediately. It is redeemed once through the bot's `/start <token>`.

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;

/// Lifecycle of a pending action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingStatus {
    Pending,
    Redeemed,
    Expired,
}

#[derive(Debug, Error)]
#[error("unknown pending action status: {0}")]
pub struct UnknownStatus(String);

impl PendingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingStatus::Pending => "pending",
            PendingStatus::Redeemed => "redeemed",
            PendingStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for PendingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PendingStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(PendingStatus::Pending),
            "redeemed" => Ok(PendingStatus::Redeemed),
            "expired" => Ok(PendingStatus::Expired),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingAction {
    pub id: i64,
    pub telegram_id: i64,
    pub movie_id: i64,
    pub start_token: String,
    pub expires_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: PendingStatus,
    pub created_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl PendingAction {
    /// A token is usable only while pending and strictly before its expiry
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PendingStatus::Pending && now < self.expires_at
    }

    /// Status as observed at `now`; stale pending rows read as expired
    pub fn status_at(&self, now: DateTime<Utc>) -> PendingStatus {
        match self.status {
            PendingStatus::Pending if now >= self.expires_at => PendingStatus::Expired,
            status => status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePendingActionRequest {
    pub telegram_id: i64,
    pub movie_id: i64,
    pub start_token: String,
    pub expires_at: DateTime<Utc>,
}

/// What a redeemed token resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemedAction {
    pub telegram_id: i64,
    pub movie_id: i64,
}

impl From<&PendingAction> for RedeemedAction {
    fn from(action: &PendingAction) -> Self {
        Self {
            telegram_id: action.telegram_id,
            movie_id: action.movie_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(expires_in_minutes: i64, status: PendingStatus) -> (PendingAction, DateTime<Utc>) {
        let now = Utc::now();
        let action = PendingAction {
            id: 1,
            telegram_id: 42,
            movie_id: 7,
            start_token: "token".to_string(),
            expires_at: now + chrono::Duration::minutes(expires_in_minutes),
            status,
            created_at: now,
            redeemed_at: None,
        };
        (action, now)
    }

    #[test]
    fn test_redeemable_only_while_pending_and_unexpired() {
        let (fresh, now) = action(15, PendingStatus::Pending);
        assert!(fresh.is_redeemable_at(now));
        assert!(!fresh.is_redeemable_at(now + chrono::Duration::minutes(16)));
        assert!(!fresh.is_redeemable_at(fresh.expires_at));

        let (used, now) = action(15, PendingStatus::Redeemed);
        assert!(!used.is_redeemable_at(now));
    }

    #[test]
    fn test_status_at_reports_expiry() {
        let (fresh, now) = action(15, PendingStatus::Pending);
        assert_eq!(fresh.status_at(now), PendingStatus::Pending);
        assert_eq!(fresh.status_at(now + chrono::Duration::minutes(15)), PendingStatus::Expired);
    }

    #[test]
    fn test_status_parses_from_column_text() {
        assert_eq!(PendingStatus::try_from("redeemed".to_string()).ok(), Some(PendingStatus::Redeemed));
        assert!(PendingStatus::try_from("lost".to_string()).is_err());
        assert_eq!(PendingStatus::Pending.to_string(), "pending");
    }
}
