//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod movie;
pub mod pending_action;
pub mod activity;
pub mod withdrawal;

// Re-export commonly used models
pub use user::{User, ReferralStats, DEFAULT_REFERRAL_CODE};
pub use movie::Movie;
pub use pending_action::{PendingAction, PendingStatus, CreatePendingActionRequest, RedeemedAction};
pub use activity::{ActivityLog, CreateActivityLogRequest};
pub use withdrawal::{WithdrawalRequest, CreateWithdrawalRequest};
