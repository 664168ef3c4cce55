//! Seat hold records and their state machine.

use chrono::{DateTime, Utc};
use common::{FlightId, HoldId};
use serde::{Deserialize, Serialize};

/// Externally visible status of a hold.
///
/// State transitions:
/// ```text
///          hold              confirm
/// (none) ──────► Held ──────────────► Confirmed
///                 │  \
///         release │   \ expiry detected on touch
///                 ▼    ▼
///           Released   Expired
/// ```
///
/// `Confirmed` can still be released (cancellation). `Released` and
/// `Expired` are never stored; the record is removed and the status is only
/// reported by the operation that removed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldStatus {
    Held,
    Confirmed,
    Released,
    Expired,
}

impl HoldStatus {
    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldStatus::Held => "HELD",
            HoldStatus::Confirmed => "CONFIRMED",
            HoldStatus::Released => "RELEASED",
            HoldStatus::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State tag of a stored hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HoldState {
    #[default]
    Held,
    Confirmed,
}

impl From<HoldState> for HoldStatus {
    fn from(state: HoldState) -> Self {
        match state {
            HoldState::Held => HoldStatus::Held,
            HoldState::Confirmed => HoldStatus::Confirmed,
        }
    }
}

/// A time-limited reservation of seats on one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatHold {
    pub hold_id: HoldId,
    pub flight_id: FlightId,
    pub seat_count: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    state: HoldState,
}

impl SeatHold {
    pub(crate) fn new(
        flight_id: FlightId,
        seat_count: u32,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hold_id: HoldId::generate(),
            flight_id,
            seat_count,
            created_at,
            expires_at,
            state: HoldState::Held,
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn status(&self) -> HoldStatus {
        self.state.into()
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == HoldState::Confirmed
    }

    /// Returns true if the hold is unconfirmed and `now` is past its expiry.
    ///
    /// Confirmed holds have consumed their seats and never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.state == HoldState::Held && now > self.expires_at
    }

    pub(crate) fn confirm(&mut self) {
        self.state = HoldState::Confirmed;
    }
}
