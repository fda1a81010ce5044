//! In-memory store
//!
//! Implements every storage trait over a mutex-guarded set of tables. Used by
//! the test suite and by local runs configured with `database.url = "memory://"`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::database::store::{
    ActivityStore, MovieStore, PendingActionStore, Stores, UserStore, WithdrawalStore,
};
use crate::models::{
    ActivityLog, CreateActivityLogRequest, CreatePendingActionRequest, CreateWithdrawalRequest,
    Movie, PendingAction, PendingStatus, User, WithdrawalRequest,
};
use crate::utils::errors::{DramamuError, Result};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: HashMap<i64, User>,
    movies: Vec<Movie>,
    pending_actions: HashMap<String, PendingAction>,
    activity_logs: Vec<ActivityLog>,
    withdrawals: Vec<WithdrawalRequest>,
    unavailable: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Trait-object handles backed by this store
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            users: self.clone(),
            movies: self.clone(),
            pending_actions: self.clone(),
            activity: self.clone(),
            withdrawals: self.clone(),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| DramamuError::ServiceUnavailable("memory store lock poisoned".to_string()))?;
        if tables.unavailable {
            return Err(DramamuError::ServiceUnavailable("memory store is offline".to_string()));
        }
        Ok(tables)
    }

    fn tables_unchecked(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every subsequent storage call fail, to exercise error paths
    pub fn set_unavailable(&self, unavailable: bool) {
        self.tables_unchecked().unavailable = unavailable;
    }

    pub fn add_movie(&self, title: &str, video_link: &str) -> Movie {
        let mut tables = self.tables_unchecked();
        let movie = Movie {
            id: tables.next_id(),
            title: title.to_string(),
            description: None,
            poster_url: None,
            video_link: video_link.to_string(),
        };
        tables.movies.push(movie.clone());
        movie
    }

    /// Create or update a user with the given entitlement
    pub fn set_vip(&self, telegram_id: i64, is_vip: bool) {
        let mut tables = self.tables_unchecked();
        let id = tables.next_id();
        tables
            .users
            .entry(telegram_id)
            .or_insert_with(|| new_user(id, telegram_id))
            .is_vip = is_vip;
    }

    pub fn set_referrals(&self, telegram_id: i64, code: Option<&str>, balance: i64, total: i32) {
        let mut tables = self.tables_unchecked();
        let id = tables.next_id();
        let user = tables
            .users
            .entry(telegram_id)
            .or_insert_with(|| new_user(id, telegram_id));
        user.referral_code = code.map(str::to_string);
        user.commission_balance = balance;
        user.total_referrals = total;
    }

    pub fn user_count(&self) -> usize {
        self.tables_unchecked().users.len()
    }

    pub fn pending_actions(&self) -> Vec<PendingAction> {
        self.tables_unchecked().pending_actions.values().cloned().collect()
    }

    pub fn activity_logs(&self) -> Vec<ActivityLog> {
        self.tables_unchecked().activity_logs.clone()
    }

    pub fn withdrawals(&self) -> Vec<WithdrawalRequest> {
        self.tables_unchecked().withdrawals.clone()
    }
}

fn new_user(id: i64, telegram_id: i64) -> User {
    User {
        id,
        telegram_id,
        is_vip: false,
        referral_code: None,
        commission_balance: 0,
        total_referrals: 0,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        Ok(self.tables()?.users.get(&telegram_id).cloned())
    }

    async fn insert_if_absent(&self, telegram_id: i64) -> Result<bool> {
        let mut tables = self.tables()?;
        if tables.users.contains_key(&telegram_id) {
            return Ok(false);
        }
        let id = tables.next_id();
        tables.users.insert(telegram_id, new_user(id, telegram_id));
        Ok(true)
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Movie>> {
        let mut movies = self.tables()?.movies.clone();
        movies.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(movies)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>> {
        Ok(self.tables()?.movies.iter().find(|m| m.id == id).cloned())
    }
}

#[async_trait]
impl PendingActionStore for MemoryStore {
    async fn create(&self, request: CreatePendingActionRequest) -> Result<PendingAction> {
        let mut tables = self.tables()?;
        if tables.pending_actions.contains_key(&request.start_token) {
            return Err(DramamuError::Conflict("start_token already exists".to_string()));
        }
        let action = PendingAction {
            id: tables.next_id(),
            telegram_id: request.telegram_id,
            movie_id: request.movie_id,
            start_token: request.start_token,
            expires_at: request.expires_at,
            status: PendingStatus::Pending,
            created_at: Utc::now(),
            redeemed_at: None,
        };
        tables.pending_actions.insert(action.start_token.clone(), action.clone());
        Ok(action)
    }

    async fn find_valid(&self, token: &str, now: DateTime<Utc>) -> Result<Option<PendingAction>> {
        Ok(self
            .tables()?
            .pending_actions
            .get(token)
            .filter(|action| action.is_redeemable_at(now))
            .cloned())
    }

    async fn redeem(&self, token: &str, now: DateTime<Utc>) -> Result<Option<PendingAction>> {
        let mut tables = self.tables()?;
        match tables.pending_actions.get_mut(token) {
            Some(action) if action.is_redeemable_at(now) => {
                action.status = PendingStatus::Redeemed;
                action.redeemed_at = Some(now);
                Ok(Some(action.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn record(&self, request: CreateActivityLogRequest) -> Result<ActivityLog> {
        let mut tables = self.tables()?;
        let log = ActivityLog {
            id: tables.next_id(),
            telegram_id: request.telegram_id,
            action: request.action,
            movie_id: request.movie_id,
            status: request.status,
            created_at: Utc::now(),
        };
        tables.activity_logs.push(log.clone());
        Ok(log)
    }
}

#[async_trait]
impl WithdrawalStore for MemoryStore {
    async fn create(&self, request: CreateWithdrawalRequest) -> Result<WithdrawalRequest> {
        let mut tables = self.tables()?;
        let withdrawal = WithdrawalRequest {
            id: tables.next_id(),
            telegram_id: request.telegram_id,
            amount: request.amount,
            method: request.method,
            account_number: request.account_number,
            account_name: request.account_name,
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        tables.withdrawals.push(withdrawal.clone());
        Ok(withdrawal)
    }
}
