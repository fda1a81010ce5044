//! Database connection management

use sqlx::{Pool, Postgres};
use std::time::Duration;
use crate::config::DatabaseConfig;
use tracing::info;
use crate::utils::errors::Result;

pub type DatabasePool = Pool<Postgres>;

/// URL scheme that selects the in-memory store instead of PostgreSQL
pub const MEMORY_URL_SCHEME: &str = "memory://";

/// Whether the configured URL asks for the in-memory store
pub fn is_memory_url(url: &str) -> bool {
    url.starts_with(MEMORY_URL_SCHEME)
}

/// Open the pool and make sure the server answers before returning it
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Some(Duration::from_secs(600)))
        .max_lifetime(Some(Duration::from_secs(1800)))
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;
    info!(max_connections = config.max_connections, "PostgreSQL pool ready");
    Ok(pool)
}

/// Apply the embedded migrations under `migrations/`
pub async fn run_migrations(pool: &DatabasePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

pub async fn health_check(pool: &DatabasePool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
