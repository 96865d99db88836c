use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::routing::{get, put};
use serde::Deserialize;

use crate::engine::fleet::refresh_fleet;
use crate::error::AppError;
use crate::models::taxi::{Location, Taxi};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/location", put(set_location))
        .route("/api/taxis", get(list_taxis))
}

#[derive(Deserialize)]
pub struct SetLocationRequest {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct ListTaxisQuery {
    #[serde(default)]
    pub available: Option<bool>,
}

/// Sets the pickup point and regenerates the fleet around it.
async fn set_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetLocationRequest>,
) -> Result<Json<Vec<Taxi>>, AppError> {
    let (lat, lng) = match (payload.lat, payload.lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(AppError::BadRequest("Missing required fields".to_string()));
        }
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest("Invalid coordinates".to_string()));
    }

    let pickup = Location {
        lat,
        lng,
        address: payload.address,
    };

    let taxis = refresh_fleet(&state, &pickup).await;
    *state.pickup.lock().await = Some(pickup);

    Ok(Json(taxis))
}

/// Current fleet, sorted ascending by distance. Empty until a location is set.
async fn list_taxis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTaxisQuery>,
) -> Json<Vec<Taxi>> {
    let mut taxis: Vec<Taxi> = state
        .fleet
        .iter()
        .filter(|entry| match query.available {
            Some(wanted) => entry.value().is_available == wanted,
            None => true,
        })
        .map(|entry| entry.value().clone())
        .collect();

    taxis.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Json(taxis)
}
