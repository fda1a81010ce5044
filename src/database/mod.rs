//! Database module
//!
//! This module handles database connections, storage traits and their implementations

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check, is_memory_url};
pub use memory::MemoryStore;
pub use repositories::{UserRepository, MovieRepository, PendingActionRepository, ActivityRepository, WithdrawalRepository};
pub use service::DatabaseService;
pub use store::{UserStore, MovieStore, PendingActionStore, ActivityStore, WithdrawalStore, Stores};
