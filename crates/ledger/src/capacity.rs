//! Initial seat capacity sources.

use std::collections::BTreeMap;

use common::FlightId;

/// Provides the initial seat capacity of each flight.
pub trait CapacitySource: Send + Sync {
    /// Returns every known flight with its total seat capacity.
    fn capacities(&self) -> Vec<(FlightId, u32)>;
}

/// A fixed table of flight capacities, e.g. from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCapacity {
    flights: BTreeMap<FlightId, u32>,
}

impl StaticCapacity {
    /// Creates an empty capacity table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo schedule the booking front-end ships with.
    pub fn demo() -> Self {
        Self::new()
            .with_flight("AI202", 14)
            .with_flight("6E310", 10)
            .with_flight("UK811", 8)
    }

    /// Adds or replaces a flight's capacity.
    pub fn with_flight(mut self, flight_id: impl Into<FlightId>, capacity: u32) -> Self {
        self.flights.insert(flight_id.into(), capacity);
        self
    }

    /// Returns the configured capacity of a flight.
    pub fn get(&self, flight_id: &FlightId) -> Option<u32> {
        self.flights.get(flight_id).copied()
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

impl FromIterator<(FlightId, u32)> for StaticCapacity {
    fn from_iter<I: IntoIterator<Item = (FlightId, u32)>>(iter: I) -> Self {
        Self {
            flights: iter.into_iter().collect(),
        }
    }
}

impl CapacitySource for StaticCapacity {
    fn capacities(&self) -> Vec<(FlightId, u32)> {
        self.flights
            .iter()
            .map(|(id, seats)| (id.clone(), *seats))
            .collect()
    }
}
