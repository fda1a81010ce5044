use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::api::requests::{MovieRequestBody, WithdrawReferralBody};
use crate::api::{ApiError, AppState};
use crate::services::{DeliveryChannel, DeliveryOutcome};
use crate::utils::errors::DramamuError;

type ApiResult = Result<Json<Value>, ApiError>;

fn invalid_body(rejection: JsonRejection) -> DramamuError {
    DramamuError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
}

fn telegram_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| DramamuError::InvalidInput("Invalid ID format".to_string()).into())
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Dramamu API", "status": "running" }))
}

/// `GET /health` is always 200; the body says whether storage answers
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let health = state.services.health_check().await;
    if health.is_healthy() {
        Json(json!({ "status": "healthy", "database": health.database }))
    } else {
        Json(json!({ "status": "unhealthy", "error": health.error }))
    }
}

/// `GET /api/v1/movies`
pub async fn list_movies(State(state): State<AppState>) -> ApiResult {
    let movies = state.services.catalog_service.list_movies().await?;
    Ok(Json(json!({ "movies": movies })))
}

/// `GET /api/v1/user_status/{telegram_id}`
pub async fn user_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult {
    let status = state.services.user_service.user_status(telegram_id(path)?).await?;
    Ok(Json(serde_json::to_value(status).map_err(DramamuError::from)?))
}

/// `GET /api/v1/referral_stats/{telegram_id}`
pub async fn referral_stats(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult {
    let stats = state.services.user_service.referral_stats(telegram_id(path)?).await?;
    Ok(Json(serde_json::to_value(stats).map_err(DramamuError::from)?))
}

/// `POST /api/v1/handle_movie_request` and `POST /movie-delivery`
pub async fn handle_movie_request(
    State(state): State<AppState>,
    body: Result<Json<MovieRequestBody>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(invalid_body)?;
    let request = body.into_delivery_request()?;

    let outcome = state.services.delivery_service.request_delivery(&request).await?;
    let response = match outcome {
        DeliveryOutcome::Delivered { movie_title, channel } => {
            let message = match channel {
                DeliveryChannel::Video => "Film berhasil dikirim ke chat Telegram Anda!",
                DeliveryChannel::TextLink => "Link film dikirim ke chat Telegram Anda!",
            };
            json!({ "status": "success", "message": message, "movie_title": movie_title })
        }
        DeliveryOutcome::NotEntitled { movie_title } => json!({
            "status": "vip_required",
            "message": "Upgrade ke VIP untuk menonton film ini",
            "movie_title": movie_title,
        }),
        DeliveryOutcome::FallbackIssued { link, .. } => json!({
            "status": "need_start",
            "message": "Silakan start bot terlebih dahulu",
            "link": link,
        }),
        DeliveryOutcome::Undelivered => json!({
            "status": "error",
            "message": "Failed to create fallback",
        }),
    };

    Ok(Json(response))
}

/// `GET /api/v1/pending/{token}` and `GET /pending/{token}`
///
/// Reports whether a start token is still usable. The token is only consumed
/// when the user opens the bot with it.
pub async fn pending_action(State(state): State<AppState>, Path(token): Path<String>) -> ApiResult {
    let response = match state.services.ledger().lookup(&token).await? {
        Some(action) => json!({
            "telegram_id": action.telegram_id,
            "movie_id": action.movie_id,
            "valid": true,
        }),
        None => json!({ "valid": false, "message": "Token expired or invalid" }),
    };
    Ok(Json(response))
}

/// `POST /api/v1/withdraw_referral`
pub async fn withdraw_referral(
    State(state): State<AppState>,
    body: Result<Json<WithdrawReferralBody>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(invalid_body)?;
    let withdrawal = state.services.user_service.submit_withdrawal(body.into_withdrawal()?).await?;

    info!(withdrawal_id = withdrawal.id, telegram_id = withdrawal.telegram_id, "Withdrawal accepted");
    Ok(Json(json!({ "status": "success", "message": "Withdrawal request submitted" })))
}
