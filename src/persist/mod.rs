//! Persistence abstraction and the flat-file implementation.

/// Flat-file load/save of the flight and booking catalogs.
pub mod flatfile;

use crate::{booking::Booking, flight::Flight};

/// Errors surfaced by the persistence layer.
#[derive(Debug)]
pub enum PersistError {
    /// Underlying file I/O failure.
    Io(std::io::Error),
    /// A persisted line failed to parse; the whole load call is aborted.
    MalformedRecord {
        /// 1-based line number within the offending file.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// Anything else.
    Message(String),
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Persistence result alias.
pub type PersistResult<T> = Result<T, PersistError>;

/// Full-state sink the runtime flushes to on save and shutdown.
///
/// `write_snapshot` always performs a complete overwrite from current
/// in-memory state; save is idempotent and may be called many times.
pub trait SnapshotSink: Send {
    /// Overwrites persisted state with the given catalogs.
    fn write_snapshot(&mut self, flights: &[Flight], bookings: &[Booking]) -> PersistResult<()>;

    /// Forces buffered data to durable storage.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
