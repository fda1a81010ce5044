//! Entitlement service
//!
//! Answers "is this user VIP?" and registers unknown users on first contact.
//! Storage failures read as "not VIP" so the delivery decision is always total.

use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::database::UserStore;

#[derive(Clone)]
pub struct EntitlementService {
    users: Arc<dyn UserStore>,
}

impl EntitlementService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Whether `telegram_id` holds a VIP entitlement; fails closed
    pub async fn is_vip(&self, telegram_id: i64) -> bool {
        match self.users.find_by_telegram_id(telegram_id).await {
            Ok(Some(user)) => {
                debug!(telegram_id = telegram_id, is_vip = user.is_vip, "Entitlement looked up");
                user.is_vip
            }
            Ok(None) => {
                match self.users.insert_if_absent(telegram_id).await {
                    Ok(true) => info!(telegram_id = telegram_id, "New user registered on first contact"),
                    Ok(false) => debug!(telegram_id = telegram_id, "User registered concurrently"),
                    Err(e) => warn!(telegram_id = telegram_id, error = %e, "Failed to register user"),
                }
                false
            }
            Err(e) => {
                warn!(telegram_id = telegram_id, error = %e, "Entitlement lookup failed, treating as not VIP");
                false
            }
        }
    }
}
