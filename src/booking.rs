//! Booking ledger records, drafts, and operation result payloads.

use serde::{Deserialize, Serialize};

use crate::types::{FlightId, PassengerId};

/// Authoritative booking record. Immutable after creation.
///
/// `flight_id` is a weak reference: the flight it names may be absent, and
/// every lookup through it treats absence as a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// System-assigned passenger identifier.
    pub passenger_id: PassengerId,
    /// Passenger name.
    pub name: String,
    /// Gender code, free text, unvalidated.
    pub gender: String,
    /// Passenger age.
    pub age: u32,
    /// Referenced flight id (may dangle).
    pub flight_id: FlightId,
    /// Seats held by this booking, always positive.
    pub seats: u32,
}

/// Passenger fields supplied by the caller when creating a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    /// Passenger name.
    pub name: String,
    /// Gender code, free text.
    pub gender: String,
    /// Passenger age.
    pub age: u32,
}

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    /// Identifier allocated to the new booking.
    pub passenger_id: PassengerId,
    /// Price per seat times booked seats.
    pub total_price: f64,
}

/// Result of reversing the most recent booking.
///
/// The flags report which structures actually held the record: a booking
/// that was already checked in legitimately yields `removed_from_queue:
/// false`, and a dangling flight reference yields `seats_restored: false`.
/// Neither is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    /// The reversed booking snapshot.
    pub booking: Booking,
    /// Seat inventory was returned to the referenced flight.
    pub seats_restored: bool,
    /// The record was still present in the ledger.
    pub removed_from_ledger: bool,
    /// The record was still waiting in the check-in queue.
    pub removed_from_queue: bool,
}
