//! Database repositories module
//!
//! This module contains the PostgreSQL implementations of the storage traits

pub mod user;
pub mod movie;
pub mod pending_action;
pub mod activity;
pub mod withdrawal;

// Re-export repositories
pub use user::UserRepository;
pub use movie::MovieRepository;
pub use pending_action::PendingActionRepository;
pub use activity::ActivityRepository;
pub use withdrawal::WithdrawalRepository;
