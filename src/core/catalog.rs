//! Insertion-ordered flight catalog with id and route indices.

use crate::{
    core::indices::{FlightIdIndex, RouteIndex},
    flight::Flight,
    types::FlightId,
};

/// Owns every flight record and both derived indices.
///
/// The insertion-order vec, the id index, and the route index are all fed by
/// the single [`FlightCatalog::insert`], so they stay in sync by
/// construction. Lookup still falls back to a linear scan when the id index
/// misses.
#[derive(Debug, Default)]
pub struct FlightCatalog {
    flights: Vec<Flight>,
    by_id: FlightIdIndex,
    routes: RouteIndex,
}

impl FlightCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a flight in insertion order, indexes its id, and records its
    /// route. Returns the caller-assigned id. Nothing is validated.
    pub fn insert(&mut self, flight: Flight) -> FlightId {
        let id = flight.id;
        self.routes.add(&flight.origin, &flight.destination);
        self.by_id.insert(id, self.flights.len());
        self.flights.push(flight);
        id
    }

    /// Finds a flight by id: index first, linear scan fallback.
    pub fn find(&self, id: FlightId) -> Option<&Flight> {
        if let Some(slot) = self.by_id.lookup(id)
            && let Some(flight) = self.flights.get(slot)
            && flight.id == id
        {
            return Some(flight);
        }
        self.flights.iter().find(|f| f.id == id)
    }

    /// Mutable flavor of [`FlightCatalog::find`].
    pub fn find_mut(&mut self, id: FlightId) -> Option<&mut Flight> {
        let slot = match self.by_id.lookup(id) {
            Some(slot) if self.flights.get(slot).is_some_and(|f| f.id == id) => Some(slot),
            _ => self.flights.iter().position(|f| f.id == id),
        };
        slot.and_then(|s| self.flights.get_mut(s))
    }

    /// All flights in insertion order.
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Insertion-order iteration; non-mutating and restartable.
    pub fn iter(&self) -> impl Iterator<Item = &Flight> {
        self.flights.iter()
    }

    /// Destinations reachable from `origin`, or `None` when there are none.
    pub fn destinations_from(&self, origin: &str) -> Option<&[String]> {
        self.routes.destinations_from(origin)
    }

    /// Route index view, mainly for inspection in tests.
    pub fn routes(&self) -> &RouteIndex {
        &self.routes
    }

    /// Number of catalog records.
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// True when the catalog holds no flights.
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
