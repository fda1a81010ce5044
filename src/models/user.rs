//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Placeholder shown by the Mini App when a user has no referral code yet
pub const DEFAULT_REFERRAL_CODE: &str = "KODE_UNIK";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub is_vip: bool,
    pub referral_code: Option<String>,
    pub commission_balance: i64,
    pub total_referrals: i32,
    pub created_at: DateTime<Utc>,
}

/// Referral figures exposed to the Mini App
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralStats {
    pub referral_code: String,
    pub commission_balance: i64,
    pub total_referrals: i32,
}

impl From<&User> for ReferralStats {
    fn from(user: &User) -> Self {
        Self {
            referral_code: user
                .referral_code
                .clone()
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| DEFAULT_REFERRAL_CODE.to_string()),
            commission_balance: user.commission_balance,
            total_referrals: user.total_referrals,
        }
    }
}

impl Default for ReferralStats {
    fn default() -> Self {
        Self {
            referral_code: DEFAULT_REFERRAL_CODE.to_string(),
            commission_balance: 0,
            total_referrals: 0,
        }
    }
}
