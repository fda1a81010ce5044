//! Database service layer
//!
//! This module wires the PostgreSQL repositories together behind the storage traits

use std::sync::Arc;
use crate::database::{
    DatabasePool, UserRepository, MovieRepository, PendingActionRepository, ActivityRepository,
    WithdrawalRepository, Stores,
};
use crate::utils::errors::DramamuError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub movies: MovieRepository,
    pub pending_actions: PendingActionRepository,
    pub activity: ActivityRepository,
    pub withdrawals: WithdrawalRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            movies: MovieRepository::new(pool.clone()),
            pending_actions: PendingActionRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            withdrawals: WithdrawalRepository::new(pool.clone()),
            pool,
        }
    }

    /// Trait-object handles for the service layer
    pub fn stores(&self) -> Stores {
        Stores {
            users: Arc::new(self.users.clone()),
            movies: Arc::new(self.movies.clone()),
            pending_actions: Arc::new(self.pending_actions.clone()),
            activity: Arc::new(self.activity.clone()),
            withdrawals: Arc::new(self.withdrawals.clone()),
        }
    }

    /// Check that the database answers queries
    pub async fn health_check(&self) -> Result<(), DramamuError> {
        super::connection::health_check(&self.pool).await
    }
}
