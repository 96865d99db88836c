use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::engine::progression;
use crate::error::AppError;
use crate::models::booking::Booking;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route(
            "/api/bookings/current",
            get(current_booking).delete(cancel_booking),
        )
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub taxi_id: Option<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let taxi_id = payload
        .taxi_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("taxi_id is required".to_string()))?;

    let booking = progression::start_booking(state.clone(), taxi_id.to_string()).await?;
    Ok(Json(booking))
}

async fn current_booking(State(state): State<Arc<AppState>>) -> Result<Json<Booking>, AppError> {
    state
        .booking
        .lock()
        .await
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no active booking".to_string()))
}

/// Cancellation is idempotent; cancelling with no active booking is a no-op.
async fn cancel_booking(State(state): State<Arc<AppState>>) -> StatusCode {
    progression::cancel_booking(&state).await;
    StatusCode::NO_CONTENT
}
