//! Flat-file persistence for the flight and booking catalogs.
//!
//! One line per record, comma-separated, no header and no escaping: a field
//! value containing the delimiter corrupts its row on reload. That is an
//! accepted format constraint, not a parsing feature.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    booking::Booking,
    core::store::ReservationStore,
    flight::Flight,
    types::{FlightId, PassengerId},
};

use super::{PersistError, PersistResult, SnapshotSink};

/// Field count of a flight line: `id,origin,destination,terminal,time,seats,price`.
pub const FLIGHT_FIELDS: usize = 7;
/// Field count of a booking line: `passengerId,name,gender,age,flightId,seats`.
pub const BOOKING_FIELDS: usize = 6;

/// Flat-file implementation of [`SnapshotSink`], plus the load side.
///
/// A missing file is not an error; it reads as "no prior data". A malformed
/// line aborts the whole load call with [`PersistError::MalformedRecord`],
/// leaving the caller's store untouched (loads build into a fresh store
/// that is only handed back on success).
pub struct FlatFileStore {
    flights_path: PathBuf,
    bookings_path: PathBuf,
}

impl FlatFileStore {
    /// Creates a store over the two given file paths. Neither file needs
    /// to exist yet.
    pub fn new(flights_path: impl Into<PathBuf>, bookings_path: impl Into<PathBuf>) -> Self {
        Self {
            flights_path: flights_path.into(),
            bookings_path: bookings_path.into(),
        }
    }

    /// Loads both files into a fresh [`ReservationStore`], rebuilding the
    /// id index, route index, undo stack, and check-in queue, and advancing
    /// the passenger counter past every loaded id.
    pub fn load_store(&self) -> PersistResult<ReservationStore> {
        let mut store = ReservationStore::new();
        self.load_flights(&mut store)?;
        self.load_bookings(&mut store)?;
        Ok(store)
    }

    /// Reads the flight file into `store`. Returns the number of records.
    pub fn load_flights(&self, store: &mut ReservationStore) -> PersistResult<usize> {
        let Some(text) = read_optional(&self.flights_path)? else {
            debug!(path = %self.flights_path.display(), "no flight file, starting empty");
            return Ok(0);
        };

        let mut count = 0;
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let flight = parse_flight(line, line_no + 1)?;
            store.add_flight(flight);
            count += 1;
        }
        debug!(count, path = %self.flights_path.display(), "flights loaded");
        Ok(count)
    }

    /// Reads the booking file into `store`. Every record lands in the
    /// ledger, the undo stack, and the check-in queue — full history, in
    /// file order, so the first undo after a restart reverses the last
    /// line of this file.
    pub fn load_bookings(&self, store: &mut ReservationStore) -> PersistResult<usize> {
        let Some(text) = read_optional(&self.bookings_path)? else {
            debug!(path = %self.bookings_path.display(), "no booking file, starting empty");
            return Ok(0);
        };

        let mut count = 0;
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let booking = parse_booking(line, line_no + 1)?;
            store.restore_booking(booking);
            count += 1;
        }
        debug!(count, path = %self.bookings_path.display(), "bookings loaded");
        Ok(count)
    }

    /// Overwrites the flight file with the given records.
    pub fn save_flights(&self, flights: &[Flight]) -> PersistResult<()> {
        let mut out = BufWriter::new(File::create(&self.flights_path)?);
        for f in flights {
            writeln!(
                out,
                "{},{},{},{},{},{},{}",
                f.id, f.origin, f.destination, f.terminal, f.departure, f.seats, f.price
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// Overwrites the booking file with the given records.
    pub fn save_bookings(&self, bookings: &[Booking]) -> PersistResult<()> {
        let mut out = BufWriter::new(File::create(&self.bookings_path)?);
        for b in bookings {
            writeln!(
                out,
                "{},{},{},{},{},{}",
                b.passenger_id, b.name, b.gender, b.age, b.flight_id, b.seats
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// Full overwrite of both files from current store state. Idempotent.
    pub fn save_store(&self, store: &ReservationStore) -> PersistResult<()> {
        self.save_flights(store.flights())?;
        self.save_bookings(store.bookings())?;
        debug!(
            flights = store.flights().len(),
            bookings = store.bookings().len(),
            "state saved"
        );
        Ok(())
    }
}

impl SnapshotSink for FlatFileStore {
    fn write_snapshot(&mut self, flights: &[Flight], bookings: &[Booking]) -> PersistResult<()> {
        self.save_flights(flights)?;
        self.save_bookings(bookings)?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> PersistResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn parse_flight(line: &str, line_no: usize) -> PersistResult<Flight> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FLIGHT_FIELDS {
        return Err(malformed(
            line_no,
            format!("expected {FLIGHT_FIELDS} fields, got {}", fields.len()),
        ));
    }
    Ok(Flight {
        id: parse_num::<FlightId>(fields[0], "id", line_no)?,
        origin: fields[1].to_string(),
        destination: fields[2].to_string(),
        terminal: fields[3].to_string(),
        departure: fields[4].to_string(),
        seats: parse_num::<u32>(fields[5], "seats", line_no)?,
        price: parse_num::<f64>(fields[6], "price", line_no)?,
    })
}

fn parse_booking(line: &str, line_no: usize) -> PersistResult<Booking> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != BOOKING_FIELDS {
        return Err(malformed(
            line_no,
            format!("expected {BOOKING_FIELDS} fields, got {}", fields.len()),
        ));
    }
    Ok(Booking {
        passenger_id: parse_num::<PassengerId>(fields[0], "passengerId", line_no)?,
        name: fields[1].to_string(),
        gender: fields[2].to_string(),
        age: parse_num::<u32>(fields[3], "age", line_no)?,
        flight_id: parse_num::<FlightId>(fields[4], "flightId", line_no)?,
        seats: parse_num::<u32>(fields[5], "seats", line_no)?,
    })
}

fn parse_num<T: std::str::FromStr>(field: &str, name: &str, line_no: usize) -> PersistResult<T> {
    field
        .parse()
        .map_err(|_| malformed(line_no, format!("field `{name}` is not numeric: {field:?}")))
}

fn malformed(line: usize, reason: String) -> PersistError {
    warn!(line, %reason, "malformed persisted record");
    PersistError::MalformedRecord { line, reason }
}
