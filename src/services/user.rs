//! User service implementation
//!
//! Read-side user queries for the Mini App (VIP status, referral figures) and
//! referral withdrawal requests.

use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::database::{UserStore, WithdrawalStore};
use crate::models::{CreateWithdrawalRequest, ReferralStats, WithdrawalRequest};
use crate::utils::errors::{DramamuError, Result};

/// VIP status as reported by `GET /api/v1/user_status/{telegram_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStatus {
    pub telegram_id: i64,
    pub is_vip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

/// User service for Mini App queries
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    withdrawals: Arc<dyn WithdrawalStore>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(users: Arc<dyn UserStore>, withdrawals: Arc<dyn WithdrawalStore>) -> Self {
        Self { users, withdrawals }
    }

    /// VIP status without registering unknown users
    pub async fn user_status(&self, telegram_id: i64) -> Result<UserStatus> {
        debug!(telegram_id = telegram_id, "Getting user status");

        let status = match self.users.find_by_telegram_id(telegram_id).await? {
            Some(user) => UserStatus {
                telegram_id,
                is_vip: user.is_vip,
                status: Some("user_found"),
            },
            None => UserStatus {
                telegram_id,
                is_vip: false,
                status: Some("user_not_found"),
            },
        };

        Ok(status)
    }

    /// Referral code, balance and count; unknown users get the placeholder figures
    pub async fn referral_stats(&self, telegram_id: i64) -> Result<ReferralStats> {
        debug!(telegram_id = telegram_id, "Getting referral stats");

        let stats = self
            .users
            .find_by_telegram_id(telegram_id)
            .await?
            .map(|user| ReferralStats::from(&user))
            .unwrap_or_default();

        Ok(stats)
    }

    /// Validate and store a referral withdrawal request
    pub async fn submit_withdrawal(&self, request: CreateWithdrawalRequest) -> Result<WithdrawalRequest> {
        if request.telegram_id <= 0 {
            return Err(DramamuError::InvalidInput("Invalid Telegram ID".to_string()));
        }

        if request.amount <= 0 {
            warn!(telegram_id = request.telegram_id, amount = request.amount, "Rejected non-positive withdrawal");
            return Err(DramamuError::InvalidInput("Invalid amount".to_string()));
        }

        let blank = [&request.method, &request.account_number, &request.account_name]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(DramamuError::InvalidInput("Missing required fields".to_string()));
        }

        let withdrawal = self.withdrawals.create(request).await?;
        info!(
            telegram_id = withdrawal.telegram_id,
            amount = withdrawal.amount,
            method = %withdrawal.method,
            "Withdrawal request submitted"
        );

        Ok(withdrawal)
    }
}
