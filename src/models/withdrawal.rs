//! Referral withdrawal request model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WithdrawalRequest {
    pub id: i64,
    pub telegram_id: i64,
    pub amount: i64,
    pub method: String,
    pub account_number: String,
    pub account_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateWithdrawalRequest {
    pub telegram_id: i64,
    pub amount: i64,
    pub method: String,
    pub account_number: String,
    pub account_name: String,
}
