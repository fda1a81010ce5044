//! Activity log model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: i64,
    pub telegram_id: i64,
    pub action: String,
    pub movie_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateActivityLogRequest {
    pub telegram_id: i64,
    pub action: String,
    pub movie_id: Option<i64>,
    pub status: String,
}
