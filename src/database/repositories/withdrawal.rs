//! Withdrawal request repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::WithdrawalStore;
use crate::models::withdrawal::{CreateWithdrawalRequest, WithdrawalRequest};
use crate::utils::errors::Result;

#[derive(Clone)]
#[derive(Debug)]
pub struct WithdrawalRepository {
    pool: PgPool,
}

impl WithdrawalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WithdrawalStore for WithdrawalRepository {
    async fn create(&self, request: CreateWithdrawalRequest) -> Result<WithdrawalRequest> {
        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            r#"
            INSERT INTO withdrawal_requests (telegram_id, amount, method, account_number, account_name, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING id, telegram_id, amount, method, account_number, account_name, status, created_at
            "#
        )
        .bind(request.telegram_id)
        .bind(request.amount)
        .bind(request.method)
        .bind(request.account_number)
        .bind(request.account_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(withdrawal)
    }
}
