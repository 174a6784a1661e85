//! Runtime event stream payloads.

use crate::types::{FlightId, PassengerId};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A flight was added to the catalog.
    FlightAdded {
        /// Caller-assigned flight id.
        id: FlightId,
    },
    /// A booking was created.
    Booked {
        /// Passenger id the booking received.
        passenger_id: PassengerId,
    },
    /// The most recent booking was reversed.
    UndoApplied {
        /// Passenger id of the reversed booking.
        passenger_id: PassengerId,
    },
    /// The front of the check-in queue was checked in.
    CheckedIn {
        /// Passenger id of the checked-in booking.
        passenger_id: PassengerId,
    },
    /// Both catalogs were flushed to the snapshot sink.
    Saved,
}
