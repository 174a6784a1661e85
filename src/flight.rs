//! Flight catalog record.

use serde::{Deserialize, Serialize};

use crate::types::FlightId;

/// Authoritative flight record.
///
/// The id is caller-assigned and never checked for uniqueness; seat count and
/// price are accepted as given. Seats are mutated only by booking (decrement)
/// and undo (increment); flights are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Caller-assigned identifier.
    pub id: FlightId,
    /// Origin airport or city, free text.
    pub origin: String,
    /// Destination airport or city, free text.
    pub destination: String,
    /// Departure terminal, free text.
    pub terminal: String,
    /// Departure time, free text, unvalidated.
    pub departure: String,
    /// Remaining seat inventory.
    pub seats: u32,
    /// Price per seat.
    pub price: f64,
}
