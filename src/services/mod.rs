//! Services module
//!
//! This module contains business logic services

pub mod catalog;
pub mod delivery;
pub mod entitlement;
pub mod init_data;
pub mod messenger;
pub mod pending;
pub mod user;

// Re-export commonly used services
pub use catalog::CatalogService;
pub use delivery::{DeliveryChannel, DeliveryOutcome, DeliveryRequest, MovieDeliveryService};
pub use entitlement::EntitlementService;
pub use init_data::{InitDataVerifier, WebAppUser};
pub use messenger::{build_bot, Messenger, TelegramMessenger};
pub use pending::PendingActionLedger;
pub use user::{UserService, UserStatus};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::{DatabaseService, Stores};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub delivery_service: MovieDeliveryService,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    database: Option<DatabaseService>,
}

impl ServiceFactory {
    /// Wire every service over the given stores and messenger
    pub fn from_stores(stores: Stores, messenger: Arc<dyn Messenger>, settings: &Settings) -> Self {
        let verifier = InitDataVerifier::new(&settings.bot.token);
        let entitlements = EntitlementService::new(stores.users.clone());
        let ledger = PendingActionLedger::new(stores.pending_actions.clone(), settings.api.pending_ttl());

        let delivery_service = MovieDeliveryService::new(
            verifier,
            entitlements,
            stores.movies.clone(),
            ledger,
            stores.activity.clone(),
            messenger,
            settings.bot.clone(),
            &settings.api,
        );

        Self {
            delivery_service,
            user_service: UserService::new(stores.users, stores.withdrawals),
            catalog_service: CatalogService::new(stores.movies),
            database: None,
        }
    }

    /// Wire every service over PostgreSQL
    pub fn with_database(database: DatabaseService, messenger: Arc<dyn Messenger>, settings: &Settings) -> Self {
        let mut factory = Self::from_stores(database.stores(), messenger, settings);
        factory.database = Some(database);
        factory
    }

    pub fn ledger(&self) -> &PendingActionLedger {
        self.delivery_service.ledger()
    }

    /// Health check for the storage backend
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let Some(database) = &self.database else {
            return ServiceHealthStatus { database: "in-memory", error: None };
        };

        match database.health_check().await {
            Ok(()) => ServiceHealthStatus { database: "connected", error: None },
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                ServiceHealthStatus {
                    database: "unreachable",
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Health status for the backing services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealthStatus {
    pub database: &'static str,
    pub error: Option<String>,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}
