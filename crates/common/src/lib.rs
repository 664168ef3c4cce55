//! Shared types for the seat inventory service.

pub mod types;

pub use types::{FlightId, HoldId};
