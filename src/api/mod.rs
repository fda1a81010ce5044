//! HTTP API for the Mini App
//!
//! JSON endpoints served with axum. Everything under `/api/v1` and the short
//! aliases is rate limited per client IP.

mod error;
pub mod requests;
pub mod routes;

pub use error::ApiError;

use std::net::IpAddr;
use std::sync::Arc;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::config::ApiConfig;
use crate::middleware::{limit_by_ip, RateLimitMiddleware};
use crate::services::ServiceFactory;
use crate::utils::errors::{DramamuError, Result};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceFactory>,
    pub limiter: Arc<RateLimitMiddleware<IpAddr>>,
}

impl AppState {
    pub fn new(services: Arc<ServiceFactory>, api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            services,
            limiter: Arc::new(RateLimitMiddleware::per_minute(api.rate_limit_per_minute)?),
        })
    }
}

/// Build the router with all routes, rate limiting, tracing and CORS
pub fn build_router(state: AppState, api: &ApiConfig) -> Result<Router> {
    let limited = Router::new()
        .route("/api/v1/movies", get(routes::list_movies))
        .route("/api/v1/user_status/{telegram_id}", get(routes::user_status))
        .route("/api/v1/referral_stats/{telegram_id}", get(routes::referral_stats))
        .route("/api/v1/handle_movie_request", post(routes::handle_movie_request))
        .route("/movie-delivery", post(routes::handle_movie_request))
        .route("/api/v1/pending/{token}", get(routes::pending_action))
        .route("/pending/{token}", get(routes::pending_action))
        .route("/api/v1/withdraw_referral", post(routes::withdraw_referral))
        .route_layer(middleware::from_fn_with_state(state.limiter.clone(), limit_by_ip));

    let router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .merge(limited)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&api.allowed_origins)?)
        .with_state(state);

    Ok(router)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| DramamuError::Config(format!("Invalid CORS origin {}: {}", origin, e)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}
