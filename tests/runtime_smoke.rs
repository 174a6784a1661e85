use std::time::Duration;

use tempfile::TempDir;

use skybook::{
    booking::BookingDraft,
    core::store::ReservationStore,
    flight::Flight,
    persist::flatfile::FlatFileStore,
    runtime::{
        events::LedgerEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_skybook},
    },
};

fn flight(id: u32, seats: u32, price: f64) -> Flight {
    Flight {
        id,
        origin: "DEL".to_string(),
        destination: "BOM".to_string(),
        terminal: "T3".to_string(),
        departure: "09:40".to_string(),
        seats,
        price,
    }
}

fn draft(name: &str) -> BookingDraft {
    BookingDraft {
        name: name.to_string(),
        gender: "F".to_string(),
        age: 30,
    }
}

async fn next_event(sub: &mut tokio::sync::broadcast::Receiver<LedgerEvent>) -> LedgerEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event timeout")
        .expect("recv")
}

#[tokio::test]
async fn runtime_books_queries_and_emits_ordered_events() {
    let handle = spawn_skybook(ReservationStore::new(), None, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let id = handle.add_flight(flight(1, 5, 100.0)).await.expect("add");
    assert_eq!(id, 1);

    let receipt = handle.book(1, draft("Alice"), 3).await.expect("book");
    assert_eq!(receipt.total_price, 300.0);

    let flights = handle.flights().await.expect("flights");
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].seats, 2);

    let found = handle
        .find_passenger(receipt.passenger_id)
        .await
        .expect("query")
        .expect("booking");
    assert_eq!(found.name, "Alice");

    let dests = handle.destinations_from("DEL").await.expect("query");
    assert_eq!(dests, Some(vec!["BOM".to_string()]));

    assert_eq!(
        next_event(&mut sub).await,
        LedgerEvent::FlightAdded { id: 1 }
    );
    assert_eq!(
        next_event(&mut sub).await,
        LedgerEvent::Booked {
            passenger_id: receipt.passenger_id,
        }
    );

    let outcome = handle.undo_last().await.expect("undo");
    assert!(outcome.seats_restored);
    assert_eq!(
        next_event(&mut sub).await,
        LedgerEvent::UndoApplied {
            passenger_id: receipt.passenger_id,
        }
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_checkin_drains_fifo() {
    let handle = spawn_skybook(ReservationStore::new(), None, RuntimeConfig::default());
    handle.add_flight(flight(1, 10, 10.0)).await.expect("add");

    let a = handle.book(1, draft("A"), 1).await.expect("book").passenger_id;
    let b = handle.book(1, draft("B"), 1).await.expect("book").passenger_id;

    let queued = handle.checkin_queue().await.expect("queue");
    assert_eq!(
        queued.iter().map(|x| x.passenger_id).collect::<Vec<_>>(),
        [a, b]
    );

    assert_eq!(handle.check_in_next().await.expect("a").passenger_id, a);
    assert_eq!(handle.check_in_next().await.expect("b").passenger_id, b);
    assert!(matches!(
        handle.check_in_next().await,
        Err(RuntimeError::Store(
            skybook::core::store::StoreError::QueueEmpty
        ))
    ));

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn explicit_save_flushes_snapshot_sink() {
    let tmp = TempDir::new().expect("tmp");
    let flights_path = tmp.path().join("flights.txt");
    let bookings_path = tmp.path().join("bookings.txt");
    let sink = FlatFileStore::new(&flights_path, &bookings_path);

    let handle = spawn_skybook(
        ReservationStore::new(),
        Some(Box::new(sink)),
        RuntimeConfig {
            save_on_shutdown: false,
            ..RuntimeConfig::default()
        },
    );
    let mut sub = handle.subscribe();

    handle.add_flight(flight(1, 5, 100.0)).await.expect("add");
    handle.book(1, draft("Alice"), 2).await.expect("book");
    handle.save().await.expect("save");

    let mut saw_saved = false;
    for _ in 0..4 {
        if next_event(&mut sub).await == LedgerEvent::Saved {
            saw_saved = true;
            break;
        }
    }
    assert!(saw_saved, "expected a Saved event");

    let reloaded = FlatFileStore::new(&flights_path, &bookings_path)
        .load_store()
        .expect("load");
    assert_eq!(reloaded.flights().len(), 1);
    assert_eq!(reloaded.flights()[0].seats, 3);
    assert_eq!(reloaded.bookings().len(), 1);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn shutdown_saves_when_configured() {
    let tmp = TempDir::new().expect("tmp");
    let flights_path = tmp.path().join("flights.txt");
    let bookings_path = tmp.path().join("bookings.txt");
    let sink = FlatFileStore::new(&flights_path, &bookings_path);

    let handle = spawn_skybook(
        ReservationStore::new(),
        Some(Box::new(sink)),
        RuntimeConfig::default(),
    );

    handle.add_flight(flight(9, 4, 75.0)).await.expect("add");
    handle.book(9, draft("Noor"), 1).await.expect("book");
    handle.shutdown().await.expect("shutdown");

    let reloaded = FlatFileStore::new(&flights_path, &bookings_path)
        .load_store()
        .expect("load");
    assert_eq!(reloaded.flights().len(), 1);
    assert_eq!(reloaded.bookings().len(), 1);
    assert_eq!(reloaded.flights()[0].seats, 3);
}
