//! Ledger error types.

use common::{FlightId, HoldId};
use thiserror::Error;

/// Errors returned by ledger operations.
///
/// Every variant is an expected business outcome. A failed operation leaves
/// the ledger exactly as it was, except for [`LedgerError::HoldExpired`],
/// whose detection has already returned the hold's seats to the pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The requested seat count was zero or negative.
    #[error("seatCount must be greater than 0, got {requested}")]
    InvalidSeatCount { requested: i64 },

    /// The flight does not have enough seats left for the request.
    #[error("Insufficient seats on flight {flight_id}: requested {requested}, available {available}")]
    InsufficientSeats {
        flight_id: FlightId,
        requested: i64,
        available: u32,
    },

    /// The flight is not known to the ledger.
    #[error("Flight not found: {0}")]
    FlightNotFound(FlightId),

    /// The flight has already been registered.
    #[error("Flight already seeded: {0}")]
    FlightAlreadySeeded(FlightId),

    /// No active hold exists with this ID.
    #[error("Hold not found: {0}")]
    HoldNotFound(HoldId),

    /// The hold passed its expiry before being confirmed.
    #[error("Hold {hold_id} expired; {seats_returned} seats returned to flight {flight_id}")]
    HoldExpired {
        hold_id: HoldId,
        flight_id: FlightId,
        seats_returned: u32,
    },

    /// The hold was already confirmed.
    #[error("Hold already confirmed: {0}")]
    AlreadyConfirmed(HoldId),
}

impl LedgerError {
    /// Returns a stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            LedgerError::InvalidSeatCount { .. } => "INVALID_SEAT_COUNT",
            LedgerError::InsufficientSeats { .. } => "INSUFFICIENT_SEATS",
            LedgerError::FlightNotFound(_) => "FLIGHT_NOT_FOUND",
            LedgerError::FlightAlreadySeeded(_) => "FLIGHT_ALREADY_SEEDED",
            LedgerError::HoldNotFound(_) => "HOLD_NOT_FOUND",
            LedgerError::HoldExpired { .. } => "EXPIRED",
            LedgerError::AlreadyConfirmed(_) => "ALREADY_CONFIRMED",
        }
    }
}

/// Error returned when an unknown-flight policy string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid unknown-flight policy '{0}', expected 'zero', 'reject' or 'default:<seats>'")]
pub struct ParsePolicyError(pub String);

/// Convenience type alias for ledger results.
pub type Result<T> = std::result::Result<T, LedgerError>;
