//! Per-flight seat counters.

use std::str::FromStr;

use common::FlightId;
use serde::{Deserialize, Serialize};

use crate::error::ParsePolicyError;

/// Coarse availability label reported by a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    SoldOut,
}

impl SeatStatus {
    /// Returns `Available` if any seat is left.
    pub fn for_seats(available_seats: u32) -> Self {
        if available_seats > 0 {
            SeatStatus::Available
        } else {
            SeatStatus::SoldOut
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "AVAILABLE",
            SeatStatus::SoldOut => "SOLD_OUT",
        }
    }
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seat counters of one flight.
///
/// `available_seats` plus the seats of every stored hold always equals
/// `capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightInventory {
    pub flight_id: FlightId,
    pub capacity: u32,
    pub available_seats: u32,
}

impl FlightInventory {
    pub fn new(flight_id: FlightId, capacity: u32) -> Self {
        Self {
            flight_id,
            capacity,
            available_seats: capacity,
        }
    }

    /// Seats currently taken out of the pool by holds.
    pub fn held_seats(&self) -> u32 {
        self.capacity - self.available_seats
    }

    /// Removes `seats` from the pool, or returns false if too few are left.
    pub(crate) fn take(&mut self, seats: u32) -> bool {
        match self.available_seats.checked_sub(seats) {
            Some(left) => {
                self.available_seats = left;
                true
            }
            None => false,
        }
    }

    /// Puts `seats` back into the pool.
    ///
    /// Returns false, leaving the counters untouched, if that would push the
    /// pool past capacity.
    pub(crate) fn restore(&mut self, seats: u32) -> bool {
        match self.available_seats.checked_add(seats) {
            Some(restored) if restored <= self.capacity => {
                self.available_seats = restored;
                true
            }
            _ => {
                tracing::error!(
                    flight_id = %self.flight_id,
                    seats,
                    available = self.available_seats,
                    capacity = self.capacity,
                    "seat restore exceeds capacity"
                );
                false
            }
        }
    }
}

/// Result of an availability quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityQuote {
    pub flight_id: FlightId,
    pub available_seats: u32,
    pub status: SeatStatus,
}

/// How the ledger treats a flight it has never been seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFlightPolicy {
    /// Quote 0 seats and reject holds as sold out.
    #[default]
    ZeroCapacity,
    /// Quote 0 seats and reject holds with `FlightNotFound`.
    Reject,
    /// Register the flight with this capacity on its first hold request.
    DefaultCapacity(u32),
}

impl UnknownFlightPolicy {
    /// Seats a quote reports for a flight that has no record.
    pub fn implicit_seats(&self) -> u32 {
        match self {
            UnknownFlightPolicy::ZeroCapacity | UnknownFlightPolicy::Reject => 0,
            UnknownFlightPolicy::DefaultCapacity(seats) => *seats,
        }
    }
}

impl FromStr for UnknownFlightPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "zero" => Ok(UnknownFlightPolicy::ZeroCapacity),
            "reject" => Ok(UnknownFlightPolicy::Reject),
            other => other
                .strip_prefix("default:")
                .and_then(|seats| seats.trim().parse().ok())
                .map(UnknownFlightPolicy::DefaultCapacity)
                .ok_or_else(|| ParsePolicyError(s.to_string())),
        }
    }
}
