//! Reservation store: catalog plus booking ledger, undo stack, and
//! check-in queue behind one cohesive value.

use std::collections::VecDeque;

use crate::{
    booking::{Booking, BookingDraft, BookingReceipt, UndoOutcome},
    core::catalog::FlightCatalog,
    flight::Flight,
    types::{FlightId, PassengerId},
};

/// First passenger id ever issued by a fresh store.
pub const PASSENGER_ID_SEED: PassengerId = 1001;

/// Errors surfaced by store operations. All are values; nothing panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No flight with the given id exists in the catalog.
    FlightNotFound(FlightId),
    /// A booking requested zero seats.
    InvalidSeatCount(u32),
    /// A booking requested more seats than the flight has left.
    InsufficientSeats {
        /// Seats the caller asked for.
        requested: u32,
        /// Seats the flight still had.
        available: u32,
    },
    /// The undo stack is empty.
    NothingToUndo,
    /// The check-in queue is empty.
    QueueEmpty,
    /// No booking carries the given passenger id.
    PassengerNotFound(PassengerId),
}

/// The process-wide reservation state: flight catalog, booking ledger,
/// undo stack, check-in queue, and the passenger-id counter.
///
/// Single-caller, `&mut self`-synchronous. Concurrent access goes through
/// the single-writer runtime in [`crate::runtime`], which serializes every
/// lookup-then-mutate sequence.
#[derive(Debug)]
pub struct ReservationStore {
    catalog: FlightCatalog,
    ledger: Vec<Booking>,
    undo: Vec<Booking>,
    checkin: VecDeque<Booking>,
    next_passenger_id: PassengerId,
}

impl Default for ReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationStore {
    /// Creates an empty store with the passenger counter at its seed.
    pub fn new() -> Self {
        Self {
            catalog: FlightCatalog::new(),
            ledger: Vec::new(),
            undo: Vec::new(),
            checkin: VecDeque::new(),
            next_passenger_id: PASSENGER_ID_SEED,
        }
    }

    // ---- catalog ----

    /// Inserts a flight into the catalog and both indices.
    pub fn add_flight(&mut self, flight: Flight) -> FlightId {
        self.catalog.insert(flight)
    }

    /// Flight lookup by id (index first, linear fallback).
    pub fn find_flight(&self, id: FlightId) -> Option<&Flight> {
        self.catalog.find(id)
    }

    /// All flights in insertion order.
    pub fn flights(&self) -> &[Flight] {
        self.catalog.flights()
    }

    /// Destinations reachable from `origin`, or `None` when there are none.
    pub fn destinations_from(&self, origin: &str) -> Option<&[String]> {
        self.catalog.destinations_from(origin)
    }

    /// Read access to the catalog and its indices.
    pub fn catalog(&self) -> &FlightCatalog {
        &self.catalog
    }

    // ---- booking ----

    /// Books `seats` on `flight_id` for the passenger described by `draft`.
    ///
    /// On success the flight's inventory is decremented, the booking is
    /// appended to the ledger, a snapshot is pushed onto the undo stack and
    /// enqueued for check-in, and the receipt carries the freshly allocated
    /// passenger id plus `price * seats`.
    pub fn book(
        &mut self,
        flight_id: FlightId,
        draft: BookingDraft,
        seats: u32,
    ) -> Result<BookingReceipt, StoreError> {
        let flight = self
            .catalog
            .find_mut(flight_id)
            .ok_or(StoreError::FlightNotFound(flight_id))?;
        if seats == 0 {
            return Err(StoreError::InvalidSeatCount(seats));
        }
        if seats > flight.seats {
            return Err(StoreError::InsufficientSeats {
                requested: seats,
                available: flight.seats,
            });
        }

        flight.seats -= seats;
        let total_price = flight.price * f64::from(seats);
        let passenger_id = self.take_next_passenger_id();

        let booking = Booking {
            passenger_id,
            name: draft.name,
            gender: draft.gender,
            age: draft.age,
            flight_id,
            seats,
        };
        self.undo.push(booking.clone());
        self.checkin.push_back(booking.clone());
        self.ledger.push(booking);

        Ok(BookingReceipt {
            passenger_id,
            total_price,
        })
    }

    /// Reverses the most recent booking on the undo stack.
    ///
    /// Seat inventory goes back to the referenced flight when it still
    /// exists; the record is unlinked from the ledger and the check-in
    /// queue wherever it is still present. The outcome flags report which
    /// of those actually happened.
    pub fn undo_last(&mut self) -> Result<UndoOutcome, StoreError> {
        let snapshot = self.undo.pop().ok_or(StoreError::NothingToUndo)?;

        let seats_restored = match self.catalog.find_mut(snapshot.flight_id) {
            Some(flight) => {
                flight.seats += snapshot.seats;
                true
            }
            None => false,
        };
        let removed_from_ledger = self.remove_booking(snapshot.passenger_id);
        let removed_from_queue = self.remove_queued(snapshot.passenger_id);

        Ok(UndoOutcome {
            booking: snapshot,
            seats_restored,
            removed_from_ledger,
            removed_from_queue,
        })
    }

    /// Unlinks a booking from the ledger by passenger id. Linear scan.
    pub fn remove_booking(&mut self, pid: PassengerId) -> bool {
        match self.ledger.iter().position(|b| b.passenger_id == pid) {
            Some(pos) => {
                self.ledger.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Linear self-lookup by passenger id, first match.
    pub fn find_passenger(&self, pid: PassengerId) -> Option<&Booking> {
        self.ledger.iter().find(|b| b.passenger_id == pid)
    }

    /// All bookings in ledger (insertion) order.
    pub fn bookings(&self) -> &[Booking] {
        &self.ledger
    }

    // ---- check-in queue ----

    /// Checks in the passenger at the front of the queue.
    ///
    /// Destructive one-way transition: the dequeued entry is not retained
    /// anywhere. The ledger record stays.
    pub fn check_in_next(&mut self) -> Result<Booking, StoreError> {
        self.checkin.pop_front().ok_or(StoreError::QueueEmpty)
    }

    /// Unlinks a queued entry by passenger id regardless of its position.
    pub fn remove_queued(&mut self, pid: PassengerId) -> bool {
        match self.checkin.iter().position(|b| b.passenger_id == pid) {
            Some(pos) => {
                self.checkin.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pending check-ins in FIFO order; non-destructive.
    pub fn checkin_queue(&self) -> impl Iterator<Item = &Booking> {
        self.checkin.iter()
    }

    // ---- admin queries ----

    /// All current bookings, stably sorted ascending by passenger id.
    /// Works on a temporary copy; ledger order is untouched.
    pub fn passengers_sorted(&self) -> Vec<Booking> {
        let mut out = self.ledger.clone();
        out.sort_by_key(|b| b.passenger_id);
        out
    }

    /// Sorts the ledger copy and binary-searches it for `pid`.
    ///
    /// Deliberately re-sorts per call instead of keeping a persistent
    /// sorted index; the ledger itself must stay in insertion order.
    pub fn search_passenger(&self, pid: PassengerId) -> Result<Booking, StoreError> {
        let sorted = self.passengers_sorted();
        sorted
            .binary_search_by_key(&pid, |b| b.passenger_id)
            .map(|idx| sorted[idx].clone())
            .map_err(|_| StoreError::PassengerNotFound(pid))
    }

    // ---- load support ----

    /// Re-admits a booking read from persisted state: appends it to the
    /// ledger, pushes it onto the undo stack, enqueues it for check-in,
    /// and advances the passenger counter past its id so reloading never
    /// reissues an identifier.
    pub fn restore_booking(&mut self, booking: Booking) {
        self.next_passenger_id = self
            .next_passenger_id
            .max(booking.passenger_id.saturating_add(1));
        self.undo.push(booking.clone());
        self.checkin.push_back(booking.clone());
        self.ledger.push(booking);
    }

    // ---- introspection ----

    /// Passenger id the next booking will receive.
    pub fn next_passenger_id(&self) -> PassengerId {
        self.next_passenger_id
    }

    /// Height of the undo stack.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Entries waiting for check-in.
    pub fn queue_len(&self) -> usize {
        self.checkin.len()
    }

    fn take_next_passenger_id(&mut self) -> PassengerId {
        let id = self.next_passenger_id;
        self.next_passenger_id += 1;
        id
    }
}
