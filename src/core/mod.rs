//! In-memory authoritative store and index structures.

/// Flight identifier index and route adjacency index.
pub mod indices;
/// Insertion-ordered flight catalog.
pub mod catalog;
/// Reservation store: ledger, undo stack, check-in queue.
pub mod store;
