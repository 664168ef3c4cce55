//! The inventory ledger: seat counters, hold table and hold lifecycle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{FlightId, HoldId};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::capacity::CapacitySource;
use crate::clock::{Clock, SystemClock, expiry_after};
use crate::error::{LedgerError, Result};
use crate::flight::{AvailabilityQuote, FlightInventory, SeatStatus, UnknownFlightPolicy};
use crate::hold::{HoldStatus, SeatHold};

/// TTL applied when a hold request carries none.
pub const DEFAULT_TTL_SECS: i64 = 600;

/// Result of a successful hold request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldReceipt {
    pub hold_id: HoldId,
    pub flight_id: FlightId,
    pub seat_count: u32,
    pub status: HoldStatus,
    pub expires_at: DateTime<Utc>,
    pub available_seats: u32,
}

/// Result of a successful confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmReceipt {
    pub hold_id: HoldId,
    pub flight_id: FlightId,
    pub status: HoldStatus,
}

/// Result of a successful release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseReceipt {
    pub hold_id: HoldId,
    pub flight_id: FlightId,
    pub status: HoldStatus,
    pub seats_returned: u32,
    /// True if the released hold had been confirmed (a cancellation).
    pub was_confirmed: bool,
    pub available_seats: u32,
}

/// A flight's counters together with the holds placed against it.
///
/// Both live behind the same mutex so that check-and-decrement and
/// remove-and-increment never interleave for one flight.
#[derive(Debug)]
struct FlightEntry {
    inventory: FlightInventory,
    holds: HashMap<HoldId, SeatHold>,
}

impl FlightEntry {
    fn new(flight_id: FlightId, capacity: u32) -> Self {
        Self {
            inventory: FlightInventory::new(flight_id, capacity),
            holds: HashMap::new(),
        }
    }
}

type SharedEntry = Arc<Mutex<FlightEntry>>;

/// Builder for [`InventoryLedger`].
pub struct LedgerBuilder {
    clock: Arc<dyn Clock>,
    default_ttl_secs: i64,
    unknown_flight: UnknownFlightPolicy,
    flights: Vec<(FlightId, u32)>,
}

impl LedgerBuilder {
    fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            default_ttl_secs: DEFAULT_TTL_SECS,
            unknown_flight: UnknownFlightPolicy::default(),
            flights: Vec::new(),
        }
    }

    /// Uses `clock` as the time source for expiry.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sets the TTL for requests without one. Non-positive values keep the default.
    pub fn default_ttl_secs(mut self, secs: i64) -> Self {
        if secs > 0 {
            self.default_ttl_secs = secs;
        }
        self
    }

    pub fn unknown_flight(mut self, policy: UnknownFlightPolicy) -> Self {
        self.unknown_flight = policy;
        self
    }

    /// Seeds every flight provided by `source`.
    pub fn capacity_source(mut self, source: &dyn CapacitySource) -> Self {
        self.flights.extend(source.capacities());
        self
    }

    /// Seeds a single flight. A later seed of the same flight wins.
    pub fn flight(mut self, flight_id: impl Into<FlightId>, capacity: u32) -> Self {
        self.flights.push((flight_id.into(), capacity));
        self
    }

    pub fn build(self) -> InventoryLedger {
        let flights = self
            .flights
            .into_iter()
            .map(|(id, capacity)| {
                let entry = Arc::new(Mutex::new(FlightEntry::new(id.clone(), capacity)));
                (id, entry)
            })
            .collect();

        InventoryLedger {
            flights: RwLock::new(flights),
            hold_index: RwLock::new(HashMap::new()),
            clock: self.clock,
            default_ttl_secs: self.default_ttl_secs,
            unknown_flight: self.unknown_flight,
        }
    }
}

/// Single source of truth for seat availability and hold lifecycles.
///
/// Each flight is guarded by its own mutex, so operations on different
/// flights never block each other. The hold index maps a hold to its flight.
/// Lock order is flight, then index; the index lock is never held while a
/// flight lock is acquired.
///
/// Expiry is lazy: an unconfirmed hold past its deadline is reconciled when
/// it is next confirmed or released, or by [`InventoryLedger::sweep_expired`].
pub struct InventoryLedger {
    flights: RwLock<HashMap<FlightId, SharedEntry>>,
    hold_index: RwLock<HashMap<HoldId, FlightId>>,
    clock: Arc<dyn Clock>,
    default_ttl_secs: i64,
    unknown_flight: UnknownFlightPolicy,
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl InventoryLedger {
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::new()
    }

    /// Registers a new flight with `capacity` seats.
    #[tracing::instrument(skip(self))]
    pub fn seed_flight(&self, flight_id: FlightId, capacity: u32) -> Result<()> {
        let mut flights = self.flights.write();
        if flights.contains_key(&flight_id) {
            return Err(LedgerError::FlightAlreadySeeded(flight_id));
        }
        let entry = Arc::new(Mutex::new(FlightEntry::new(flight_id.clone(), capacity)));
        flights.insert(flight_id, entry);
        Ok(())
    }

    /// Reports the seats currently available on a flight.
    ///
    /// Does not reconcile expired holds, so seats of an expired hold nobody
    /// has touched yet still count as taken.
    pub fn quote_availability(&self, flight_id: &FlightId) -> AvailabilityQuote {
        let available_seats = match self.entry(flight_id) {
            Some(entry) => entry.lock().inventory.available_seats,
            None => self.unknown_flight.implicit_seats(),
        };

        AvailabilityQuote {
            flight_id: flight_id.clone(),
            available_seats,
            status: SeatStatus::for_seats(available_seats),
        }
    }

    /// Holds `seat_count` seats on a flight for `ttl_secs` (or the default TTL).
    #[tracing::instrument(skip(self))]
    pub fn request_hold(
        &self,
        flight_id: &FlightId,
        seat_count: i64,
        ttl_secs: Option<i64>,
    ) -> Result<HoldReceipt> {
        if seat_count <= 0 {
            reject("invalid_seat_count");
            return Err(LedgerError::InvalidSeatCount {
                requested: seat_count,
            });
        }

        let entry = match self.entry(flight_id) {
            Some(entry) => entry,
            None => match self.unknown_flight {
                UnknownFlightPolicy::Reject => {
                    reject("flight_not_found");
                    return Err(LedgerError::FlightNotFound(flight_id.clone()));
                }
                UnknownFlightPolicy::ZeroCapacity => {
                    return Err(insufficient(flight_id, seat_count, 0));
                }
                UnknownFlightPolicy::DefaultCapacity(capacity) => {
                    self.entry_or_seed(flight_id, capacity)
                }
            },
        };

        let ttl_secs = ttl_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(self.default_ttl_secs);
        let now = self.clock.now();

        let mut flight = entry.lock();
        let requested = match u32::try_from(seat_count) {
            Ok(seats) if flight.inventory.take(seats) => seats,
            _ => {
                return Err(insufficient(
                    flight_id,
                    seat_count,
                    flight.inventory.available_seats,
                ));
            }
        };

        let hold = SeatHold::new(
            flight_id.clone(),
            requested,
            now,
            expiry_after(now, ttl_secs),
        );
        let receipt = HoldReceipt {
            hold_id: hold.hold_id.clone(),
            flight_id: flight_id.clone(),
            seat_count: requested,
            status: hold.status(),
            expires_at: hold.expires_at,
            available_seats: flight.inventory.available_seats,
        };
        flight.holds.insert(hold.hold_id.clone(), hold);
        self.index_hold(&receipt.hold_id, flight_id);
        drop(flight);

        metrics::counter!("inventory_holds_created_total").increment(1);
        tracing::info!(
            hold_id = %receipt.hold_id,
            %flight_id,
            seats = requested,
            available = receipt.available_seats,
            expires_at = %receipt.expires_at,
            "seats held"
        );

        Ok(receipt)
    }

    /// Confirms a hold, consuming its seats.
    ///
    /// An unconfirmed hold past its expiry is reconciled instead: its seats
    /// go back to the pool, the record is removed and `HoldExpired` is
    /// returned. Confirming twice is rejected with `AlreadyConfirmed`.
    #[tracing::instrument(skip(self))]
    pub fn confirm_hold(&self, hold_id: &HoldId) -> Result<ConfirmReceipt> {
        let entry = self.locate(hold_id)?;
        let now = self.clock.now();

        let mut flight = entry.lock();
        let hold = flight
            .holds
            .get_mut(hold_id)
            .ok_or_else(|| LedgerError::HoldNotFound(hold_id.clone()))?;

        if hold.is_confirmed() {
            reject("already_confirmed");
            return Err(LedgerError::AlreadyConfirmed(hold_id.clone()));
        }

        if !hold.is_expired_at(now) {
            hold.confirm();
            let receipt = ConfirmReceipt {
                hold_id: hold_id.clone(),
                flight_id: hold.flight_id.clone(),
                status: hold.status(),
            };
            drop(flight);

            metrics::counter!("inventory_holds_confirmed_total").increment(1);
            tracing::info!(%hold_id, flight_id = %receipt.flight_id, "hold confirmed");
            return Ok(receipt);
        }

        let expired = self
            .reclaim(&mut flight, hold_id)
            .ok_or_else(|| LedgerError::HoldNotFound(hold_id.clone()))?;
        drop(flight);

        metrics::counter!("inventory_holds_expired_total").increment(1);
        tracing::warn!(
            %hold_id,
            flight_id = %expired.flight_id,
            seats = expired.seat_count,
            expires_at = %expired.expires_at,
            "confirm attempted on expired hold, seats returned"
        );

        Err(LedgerError::HoldExpired {
            hold_id: hold_id.clone(),
            flight_id: expired.flight_id,
            seats_returned: expired.seat_count,
        })
    }

    /// Releases a hold and returns its seats to the pool.
    ///
    /// Confirmed and expired holds are released the same way; a confirmed
    /// hold being released is a cancellation and gives its seats back. The
    /// receipt's `was_confirmed` is the only trace of that distinction, so a
    /// refund workflow that must tell the two apart needs its own record.
    #[tracing::instrument(skip(self))]
    pub fn release_hold(&self, hold_id: &HoldId) -> Result<ReleaseReceipt> {
        let entry = self.locate(hold_id)?;

        let mut flight = entry.lock();
        let hold = self
            .reclaim(&mut flight, hold_id)
            .ok_or_else(|| LedgerError::HoldNotFound(hold_id.clone()))?;
        let available_seats = flight.inventory.available_seats;
        drop(flight);

        metrics::counter!("inventory_holds_released_total").increment(1);
        tracing::info!(
            %hold_id,
            flight_id = %hold.flight_id,
            seats = hold.seat_count,
            was_confirmed = hold.is_confirmed(),
            available = available_seats,
            "hold released"
        );

        Ok(ReleaseReceipt {
            hold_id: hold_id.clone(),
            flight_id: hold.flight_id.clone(),
            status: HoldStatus::Released,
            seats_returned: hold.seat_count,
            was_confirmed: hold.is_confirmed(),
            available_seats,
        })
    }

    /// Reconciles every unconfirmed hold that is past its expiry.
    ///
    /// Returns the number of holds removed. A swept hold reports
    /// `HoldNotFound` afterwards, just like one reconciled lazily.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let entries: Vec<SharedEntry> = self.flights.read().values().cloned().collect();

        let mut reclaimed = 0;
        for entry in entries {
            let mut flight = entry.lock();
            let expired: Vec<HoldId> = flight
                .holds
                .values()
                .filter(|hold| hold.is_expired_at(now))
                .map(|hold| hold.hold_id.clone())
                .collect();

            for hold_id in expired {
                if let Some(hold) = self.reclaim(&mut flight, &hold_id) {
                    reclaimed += 1;
                    tracing::debug!(
                        %hold_id,
                        flight_id = %hold.flight_id,
                        seats = hold.seat_count,
                        "expired hold swept"
                    );
                }
            }
        }

        if reclaimed > 0 {
            metrics::counter!("inventory_holds_expired_total").increment(reclaimed as u64);
            tracing::info!(reclaimed, "expired holds swept");
        }
        reclaimed
    }

    /// Returns a snapshot of a stored hold without reconciling it.
    pub fn hold(&self, hold_id: &HoldId) -> Option<SeatHold> {
        let entry = self.locate(hold_id).ok()?;
        let flight = entry.lock();
        flight.holds.get(hold_id).cloned()
    }

    /// Returns a snapshot of a flight's counters.
    pub fn flight(&self, flight_id: &FlightId) -> Option<FlightInventory> {
        self.entry(flight_id)
            .map(|entry| entry.lock().inventory.clone())
    }

    /// Sums the seats of every stored hold on a flight.
    pub fn held_seats(&self, flight_id: &FlightId) -> u32 {
        self.entry(flight_id)
            .map(|entry| entry.lock().holds.values().map(|h| h.seat_count).sum())
            .unwrap_or(0)
    }

    /// Returns all known flight IDs in sorted order.
    pub fn flight_ids(&self) -> Vec<FlightId> {
        let mut ids: Vec<FlightId> = self.flights.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of stored (held or confirmed) holds.
    pub fn active_hold_count(&self) -> usize {
        self.hold_index.read().len()
    }

    fn entry(&self, flight_id: &FlightId) -> Option<SharedEntry> {
        self.flights.read().get(flight_id).cloned()
    }

    fn entry_or_seed(&self, flight_id: &FlightId, capacity: u32) -> SharedEntry {
        let mut flights = self.flights.write();
        flights
            .entry(flight_id.clone())
            .or_insert_with(|| {
                tracing::info!(%flight_id, capacity, "flight registered on first hold");
                Arc::new(Mutex::new(FlightEntry::new(flight_id.clone(), capacity)))
            })
            .clone()
    }

    fn locate(&self, hold_id: &HoldId) -> Result<SharedEntry> {
        let flight_id = self
            .hold_index
            .read()
            .get(hold_id)
            .cloned()
            .ok_or_else(|| LedgerError::HoldNotFound(hold_id.clone()))?;
        self.entry(&flight_id)
            .ok_or_else(|| LedgerError::HoldNotFound(hold_id.clone()))
    }

    fn index_hold(&self, hold_id: &HoldId, flight_id: &FlightId) {
        let mut index = self.hold_index.write();
        index.insert(hold_id.clone(), flight_id.clone());
        metrics::gauge!("inventory_active_holds").set(index.len() as f64);
    }

    /// Removes a hold from its flight and the index, returning its seats.
    ///
    /// The caller must hold the flight's lock.
    fn reclaim(&self, flight: &mut FlightEntry, hold_id: &HoldId) -> Option<SeatHold> {
        let hold = flight.holds.remove(hold_id)?;
        let restored = flight.inventory.restore(hold.seat_count);
        debug_assert!(restored, "hold {hold_id} returned more seats than were held");

        let mut index = self.hold_index.write();
        index.remove(hold_id);
        metrics::gauge!("inventory_active_holds").set(index.len() as f64);
        Some(hold)
    }
}

fn reject(reason: &'static str) {
    metrics::counter!("inventory_holds_rejected_total", "reason" => reason).increment(1);
}

fn insufficient(flight_id: &FlightId, requested: i64, available: u32) -> LedgerError {
    reject("insufficient_seats");
    tracing::warn!(%flight_id, requested, available, "hold rejected, insufficient seats");
    LedgerError::InsufficientSeats {
        flight_id: flight_id.clone(),
        requested,
        available,
    }
}
