//! Storage traits
//!
//! Services depend on these traits rather than on concrete repositories so the
//! same delivery logic runs against PostgreSQL and the in-memory store.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::models::{
    ActivityLog, CreateActivityLogRequest, CreatePendingActionRequest, CreateWithdrawalRequest,
    Movie, PendingAction, User, WithdrawalRequest,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>>;

    /// Insert a non-VIP user unless one already exists.
    ///
    /// Returns `true` when this call created the row. Concurrent calls for the
    /// same id must create exactly one row and must not fail.
    async fn insert_if_absent(&self, telegram_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies, newest first
    async fn list(&self) -> Result<Vec<Movie>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>>;
}

#[async_trait]
pub trait PendingActionStore: Send + Sync {
    /// Persist a new pending action; a duplicate token is a unique violation
    async fn create(&self, request: CreatePendingActionRequest) -> Result<PendingAction>;

    /// Read a token that is still pending and unexpired at `now`, without consuming it
    async fn find_valid(&self, token: &str, now: DateTime<Utc>) -> Result<Option<PendingAction>>;

    /// Atomically move a pending, unexpired token to `redeemed`.
    ///
    /// At most one caller ever receives `Some` for a given token.
    async fn redeem(&self, token: &str, now: DateTime<Utc>) -> Result<Option<PendingAction>>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn record(&self, request: CreateActivityLogRequest) -> Result<ActivityLog>;
}

#[async_trait]
pub trait WithdrawalStore: Send + Sync {
    async fn create(&self, request: CreateWithdrawalRequest) -> Result<WithdrawalRequest>;
}

/// Handles to every store the services need
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieStore>,
    pub pending_actions: Arc<dyn PendingActionStore>,
    pub activity: Arc<dyn ActivityStore>,
    pub withdrawals: Arc<dyn WithdrawalStore>,
}
