//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger::LedgerError;
use serde_json::{Map, Value, json};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Ledger rejected the operation.
    Ledger(LedgerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = json!({ "error": msg, "reason": "BAD_REQUEST" });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            ApiError::Ledger(err) => {
                let status = ledger_status(&err);
                (status, axum::Json(ledger_body(&err))).into_response()
            }
        }
    }
}

/// Maps each ledger outcome to an HTTP status.
pub fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::InvalidSeatCount { .. } => StatusCode::BAD_REQUEST,
        LedgerError::FlightNotFound(_) | LedgerError::HoldNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::InsufficientSeats { .. }
        | LedgerError::HoldExpired { .. }
        | LedgerError::AlreadyConfirmed(_)
        | LedgerError::FlightAlreadySeeded(_) => StatusCode::CONFLICT,
    }
}

fn ledger_body(err: &LedgerError) -> Value {
    let mut body = Map::new();
    body.insert("error".into(), err.to_string().into());
    body.insert("reason".into(), err.reason().into());

    match err {
        LedgerError::InsufficientSeats {
            flight_id,
            available,
            ..
        } => {
            body.insert("flightId".into(), flight_id.as_str().into());
            body.insert("status".into(), "REJECTED".into());
            body.insert("availableSeats".into(), (*available).into());
        }
        LedgerError::HoldExpired {
            hold_id, flight_id, ..
        } => {
            body.insert("holdId".into(), hold_id.as_str().into());
            body.insert("flightId".into(), flight_id.as_str().into());
            body.insert("status".into(), "EXPIRED".into());
        }
        LedgerError::HoldNotFound(hold_id) | LedgerError::AlreadyConfirmed(hold_id) => {
            body.insert("holdId".into(), hold_id.as_str().into());
        }
        LedgerError::FlightNotFound(flight_id) | LedgerError::FlightAlreadySeeded(flight_id) => {
            body.insert("flightId".into(), flight_id.as_str().into());
        }
        LedgerError::InvalidSeatCount { .. } => {}
    }

    Value::Object(body)
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
