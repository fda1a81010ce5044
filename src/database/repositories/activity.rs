//! Activity log repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::ActivityStore;
use crate::models::activity::{ActivityLog, CreateActivityLogRequest};
use crate::utils::errors::Result;

#[derive(Clone)]
#[derive(Debug)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn record(&self, request: CreateActivityLogRequest) -> Result<ActivityLog> {
        let log = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (telegram_id, action, movie_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, telegram_id, action, movie_id, status, created_at
            "#
        )
        .bind(request.telegram_id)
        .bind(request.action)
        .bind(request.movie_id)
        .bind(request.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }
}
