//! Pending action repository implementation

use std::time::Instant;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use crate::database::store::PendingActionStore;
use crate::models::pending_action::{CreatePendingActionRequest, PendingAction};
use crate::utils::errors::{DramamuError, Result};
use crate::utils::logging::log_database_operation;

const COLUMNS: &str = "id, telegram_id, movie_id, start_token, expires_at, status, created_at, redeemed_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct PendingActionRepository {
    pool: PgPool,
}

impl PendingActionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingActionStore for PendingActionRepository {
    async fn create(&self, request: CreatePendingActionRequest) -> Result<PendingAction> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, PendingAction>(&format!(
            r#"
            INSERT INTO pending_actions (telegram_id, movie_id, start_token, expires_at, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.telegram_id)
        .bind(request.movie_id)
        .bind(&request.start_token)
        .bind(request.expires_at)
        .fetch_one(&self.pool)
        .await;

        log_database_operation("insert", "pending_actions", started.elapsed().as_millis() as u64, result.is_ok());

        result.map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DramamuError::Conflict("start_token already exists".to_string())
            }
            other => DramamuError::Database(other),
        })
    }

    async fn find_valid(&self, token: &str, now: DateTime<Utc>) -> Result<Option<PendingAction>> {
        let action = sqlx::query_as::<_, PendingAction>(&format!(
            "SELECT {COLUMNS} FROM pending_actions WHERE start_token = $1 AND status = 'pending' AND expires_at > $2"
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(action)
    }

    async fn redeem(&self, token: &str, now: DateTime<Utc>) -> Result<Option<PendingAction>> {
        let started = Instant::now();
        // Single-statement compare-and-swap: concurrent redeemers race on the row lock
        // and only the first sees status = 'pending'.
        let result = sqlx::query_as::<_, PendingAction>(&format!(
            r#"
            UPDATE pending_actions
            SET status = 'redeemed', redeemed_at = $2
            WHERE start_token = $1 AND status = 'pending' AND expires_at > $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;

        log_database_operation("redeem", "pending_actions", started.elapsed().as_millis() as u64, result.is_ok());

        Ok(result?)
    }
}
