//! User repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::UserStore;
use crate::models::user::User;
use crate::utils::errors::Result;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Find user by Telegram ID
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, telegram_id, is_vip, referral_code, commission_balance, total_referrals, created_at FROM users WHERE telegram_id = $1"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Register a user on first contact; a no-op when the row already exists
    async fn insert_if_absent(&self, telegram_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO users (telegram_id, is_vip) VALUES ($1, FALSE) ON CONFLICT (telegram_id) DO NOTHING"
        )
        .bind(telegram_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
