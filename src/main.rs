//! Dramamu backend
//!
//! Main application entry point: serves the Mini App API and runs the bot

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use teloxide::prelude::*;
use tracing::{info, warn};

use dramamu::{
    api::{build_router, AppState},
    config::Settings,
    database::{self, DatabaseService, MemoryStore},
    handlers,
    middleware::RateLimitMiddleware,
    services::{build_bot, Messenger, ServiceFactory, TelegramMessenger},
    utils::logging,
};

/// How often idle rate limit buckets are dropped
const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("loading configuration")?;
    settings.validate().context("validating configuration")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", dramamu::info());

    let bot = build_bot(&settings.bot.token, settings.api.delivery_timeout())?;
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let services = if database::is_memory_url(&settings.database.url) {
        warn!("Using the in-memory store; data is lost on exit");
        ServiceFactory::from_stores(MemoryStore::new().stores(), messenger, &settings)
    } else {
        info!("Connecting to database...");
        let pool = database::create_pool(&settings.database).await?;
        database::run_migrations(&pool).await?;
        ServiceFactory::with_database(DatabaseService::new(pool), messenger, &settings)
    };

    let services = Arc::new(services);
    let settings = Arc::new(settings);

    let state = AppState::new(services.clone(), &settings.api)?;
    state.limiter.clone().spawn_pruning(LIMITER_PRUNE_INTERVAL);
    let app = build_router(state, &settings.api)?;
    let listener = tokio::net::TcpListener::bind(settings.api.listen_addr)
        .await
        .with_context(|| format!("binding {}", settings.api.listen_addr))?;
    info!(addr = %settings.api.listen_addr, "API listening");

    let server = async {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("API server failed")
    };

    if settings.bot.run_polling {
        let limiter = Arc::new(RateLimitMiddleware::<i64>::per_minute(settings.api.rate_limit_per_minute)?);
        limiter.clone().spawn_pruning(LIMITER_PRUNE_INTERVAL);
        let mut dispatcher = Dispatcher::builder(bot, handlers::schema())
            .dependencies(dptree::deps![services, settings.clone(), limiter])
            .default_handler(|upd| async move {
                tracing::debug!(update_id = ?upd.id, "Unhandled update");
            })
            .enable_ctrlc_handler()
            .build();

        info!("Starting bot with polling mode...");
        let (served, ()) = tokio::join!(server, dispatcher.dispatch());
        served?;
    } else {
        info!("Bot polling disabled; serving the API only");
        server.await?;
    }

    info!("Dramamu has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
