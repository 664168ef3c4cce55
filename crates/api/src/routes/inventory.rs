//! Seat quote, hold, confirm and release endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use ledger::{FlightId, HoldId, HoldStatus, InventoryLedger, SeatStatus};
use serde::{Deserialize, Serialize};

use super::health::ServiceInfo;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub ledger: Arc<InventoryLedger>,
    pub service: ServiceInfo,
}

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldRequest {
    pub flight_id: String,
    pub seat_count: i64,
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
    /// Accepted for compatibility with booking clients; seats are not split by cabin.
    #[serde(default)]
    pub cabin: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldIdRequest {
    pub hold_id: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatsResponse {
    pub flight_id: FlightId,
    pub available_seats: u32,
    pub status: SeatStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldResponse {
    pub hold_id: HoldId,
    pub flight_id: FlightId,
    pub status: HoldStatus,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldStatusResponse {
    pub hold_id: HoldId,
    pub status: HoldStatus,
}

// -- Handlers --

/// GET /inventory/flights/{flight_id}/seats — current availability of a flight.
#[tracing::instrument(skip(state))]
pub async fn seats(
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<String>,
) -> Json<SeatsResponse> {
    let quote = state.ledger.quote_availability(&FlightId::new(flight_id));

    Json(SeatsResponse {
        flight_id: quote.flight_id,
        available_seats: quote.available_seats,
        status: quote.status,
    })
}

/// POST /inventory/hold — hold seats on a flight.
#[tracing::instrument(skip(state, payload))]
pub async fn hold(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HoldRequest>, JsonRejection>,
) -> Result<Json<HoldResponse>, ApiError> {
    let Json(req) = payload?;
    if let Some(cabin) = &req.cabin {
        tracing::debug!(%cabin, "cabin ignored for seat hold");
    }

    let flight_id = FlightId::new(&req.flight_id);
    let receipt = state
        .ledger
        .request_hold(&flight_id, req.seat_count, req.ttl_seconds)?;

    Ok(Json(HoldResponse {
        hold_id: receipt.hold_id,
        flight_id: receipt.flight_id,
        status: receipt.status,
        expires_at: receipt.expires_at,
    }))
}

/// POST /inventory/confirm-hold — confirm a hold before it expires.
#[tracing::instrument(skip(state, payload))]
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HoldIdRequest>, JsonRejection>,
) -> Result<Json<HoldStatusResponse>, ApiError> {
    let Json(req) = payload?;
    let receipt = state.ledger.confirm_hold(&HoldId::from(req.hold_id))?;

    Ok(Json(HoldStatusResponse {
        hold_id: receipt.hold_id,
        status: receipt.status,
    }))
}

/// POST /inventory/release — release a hold and return its seats.
#[tracing::instrument(skip(state, payload))]
pub async fn release(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HoldIdRequest>, JsonRejection>,
) -> Result<Json<HoldStatusResponse>, ApiError> {
    let Json(req) = payload?;
    let receipt = state.ledger.release_hold(&HoldId::from(req.hold_id))?;

    Ok(Json(HoldStatusResponse {
        hold_id: receipt.hold_id,
        status: receipt.status,
    }))
}
