//! Authoritative in-memory airline reservation ledger with flat-file
//! persistence.
//!
//! # Examples
//!
//! Synchronous usage with [`core::store::ReservationStore`]:
//! ```
//! use skybook::{booking::BookingDraft, core::store::ReservationStore, flight::Flight};
//!
//! let mut store = ReservationStore::new();
//! store.add_flight(Flight {
//!     id: 1,
//!     origin: "DEL".to_string(),
//!     destination: "BOM".to_string(),
//!     terminal: "T3".to_string(),
//!     departure: "09:40".to_string(),
//!     seats: 5,
//!     price: 100.0,
//! });
//!
//! let receipt = store
//!     .book(
//!         1,
//!         BookingDraft {
//!             name: "Alice".to_string(),
//!             gender: "F".to_string(),
//!             age: 30,
//!         },
//!         3,
//!     )
//!     .expect("book");
//! assert_eq!(receipt.passenger_id, 1001);
//! assert_eq!(receipt.total_price, 300.0);
//! assert_eq!(store.find_flight(1).expect("flight").seats, 2);
//!
//! let outcome = store.undo_last().expect("undo");
//! assert!(outcome.seats_restored);
//! assert_eq!(store.find_flight(1).expect("flight").seats, 5);
//! ```
//!
//! Runtime usage with the flat-file sink:
//! ```no_run
//! use skybook::{
//!     booking::BookingDraft,
//!     persist::flatfile::FlatFileStore,
//!     runtime::handle::{RuntimeConfig, spawn_skybook},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let files = FlatFileStore::new("flights.txt", "bookings.txt");
//! let store = files.load_store().expect("load");
//! let handle = spawn_skybook(store, Some(Box::new(files)), RuntimeConfig::default());
//!
//! let receipt = handle
//!     .book(
//!         1,
//!         BookingDraft {
//!             name: "Alice".to_string(),
//!             gender: "F".to_string(),
//!             age: 30,
//!         },
//!         2,
//!     )
//!     .await
//!     .expect("book");
//! println!("booked passenger {}", receipt.passenger_id);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Booking records, drafts, and operation result payloads.
pub mod booking;
/// In-memory catalog, indices, and the reservation store.
pub mod core;
/// Flight catalog record.
pub mod flight;
/// Persistence abstraction and flat-file implementation.
pub mod persist;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive identifier aliases.
pub mod types;
