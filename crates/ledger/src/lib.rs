//! Seat inventory ledger.
//!
//! This crate owns per-flight seat counters and the table of seat holds:
//! - [`InventoryLedger`] with hold, confirm, release and quote operations
//! - [`SeatHold`] records and the [`HoldStatus`] state machine
//! - Injectable [`Clock`] and [`CapacitySource`] collaborators
//!
//! Holds expire lazily. A hold past its deadline is reconciled the next time
//! it is confirmed or released, or when [`InventoryLedger::sweep_expired`]
//! runs.

pub mod capacity;
pub mod clock;
pub mod error;
pub mod flight;
pub mod hold;
pub mod ledger;

pub use capacity::{CapacitySource, StaticCapacity};
pub use clock::{Clock, ManualClock, SystemClock};
pub use common::{FlightId, HoldId};
pub use error::{LedgerError, ParsePolicyError, Result};
pub use flight::{AvailabilityQuote, FlightInventory, SeatStatus, UnknownFlightPolicy};
pub use hold::{HoldState, HoldStatus, SeatHold};
pub use ledger::{
    ConfirmReceipt, DEFAULT_TTL_SECS, HoldReceipt, InventoryLedger, LedgerBuilder, ReleaseReceipt,
};
