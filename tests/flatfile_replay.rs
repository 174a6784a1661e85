use std::fs;

use tempfile::TempDir;

use skybook::{
    booking::BookingDraft,
    core::store::ReservationStore,
    flight::Flight,
    persist::{PersistError, flatfile::FlatFileStore},
};

fn flight(id: u32, origin: &str, destination: &str, seats: u32, price: f64) -> Flight {
    Flight {
        id,
        origin: origin.to_string(),
        destination: destination.to_string(),
        terminal: "T2".to_string(),
        departure: "18:15".to_string(),
        seats,
        price,
    }
}

fn draft(name: &str) -> BookingDraft {
    BookingDraft {
        name: name.to_string(),
        gender: "M".to_string(),
        age: 41,
    }
}

fn files(tmp: &TempDir) -> FlatFileStore {
    FlatFileStore::new(tmp.path().join("flights.txt"), tmp.path().join("bookings.txt"))
}

#[test]
fn save_load_round_trips_state_and_routes() {
    let tmp = TempDir::new().expect("tmp");
    let files = files(&tmp);

    let mut store = ReservationStore::new();
    store.add_flight(flight(3, "DEL", "BOM", 40, 120.5));
    store.add_flight(flight(1, "DEL", "CCU", 20, 99.0));
    store.add_flight(flight(2, "BOM", "DEL", 30, 80.0));
    store.book(3, draft("Asha"), 2).expect("book");
    store.book(1, draft("Ravi"), 1).expect("book");

    files.save_store(&store).expect("save");

    let reloaded = files.load_store().expect("load");
    assert_eq!(reloaded.flights(), store.flights());
    assert_eq!(reloaded.bookings(), store.bookings());
    assert_eq!(
        reloaded.destinations_from("DEL"),
        store.destinations_from("DEL")
    );
    assert_eq!(
        reloaded.destinations_from("BOM"),
        store.destinations_from("BOM")
    );
}

#[test]
fn passenger_ids_stay_monotonic_across_reload() {
    let tmp = TempDir::new().expect("tmp");
    let files = files(&tmp);

    let mut store = ReservationStore::new();
    store.add_flight(flight(1, "DEL", "BOM", 50, 10.0));
    let first = store.book(1, draft("A"), 1).expect("book").passenger_id;
    let second = store.book(1, draft("B"), 1).expect("book").passenger_id;
    files.save_store(&store).expect("save");

    let mut reloaded = files.load_store().expect("load");
    let next = reloaded.book(1, draft("C"), 1).expect("book").passenger_id;
    assert!(next > second);
    assert!(next > first);
}

#[test]
fn reload_rebuilds_full_undo_history_in_file_order() {
    let tmp = TempDir::new().expect("tmp");
    let files = files(&tmp);

    let mut store = ReservationStore::new();
    store.add_flight(flight(1, "DEL", "BOM", 50, 10.0));
    store.book(1, draft("First"), 1).expect("book");
    let last = store.book(1, draft("Last"), 2).expect("book").passenger_id;
    files.save_store(&store).expect("save");

    let mut reloaded = files.load_store().expect("load");
    assert_eq!(reloaded.undo_len(), 2);
    assert_eq!(reloaded.queue_len(), 2);

    // The first undo after a restart reverses the last line of the file.
    let outcome = reloaded.undo_last().expect("undo");
    assert_eq!(outcome.booking.passenger_id, last);
    assert!(outcome.seats_restored);
    assert_eq!(reloaded.find_flight(1).expect("flight").seats, 49);
}

#[test]
fn missing_files_load_as_empty_state() {
    let tmp = TempDir::new().expect("tmp");
    let store = files(&tmp).load_store().expect("load");
    assert!(store.flights().is_empty());
    assert!(store.bookings().is_empty());
    assert_eq!(store.undo_len(), 0);
}

#[test]
fn blank_lines_are_skipped() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(
        tmp.path().join("flights.txt"),
        "1,DEL,BOM,T1,08:00,10,55.5\n\n2,BOM,DEL,T2,20:00,8,60\n",
    )
    .expect("write");

    let store = files(&tmp).load_store().expect("load");
    assert_eq!(store.flights().len(), 2);
    assert_eq!(store.find_flight(2).expect("flight").price, 60.0);
}

#[test]
fn malformed_field_count_aborts_load() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(
        tmp.path().join("flights.txt"),
        "1,DEL,BOM,T1,08:00,10,55.5\n2,BOM,DEL\n",
    )
    .expect("write");

    match files(&tmp).load_store() {
        Err(PersistError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed record, got {other:?}"),
    }
}

#[test]
fn malformed_number_aborts_load() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(
        tmp.path().join("bookings.txt"),
        "1001,Asha,F,notanage,1,2\n",
    )
    .expect("write");

    match files(&tmp).load_store() {
        Err(PersistError::MalformedRecord { line, reason }) => {
            assert_eq!(line, 1);
            assert!(reason.contains("age"));
        }
        other => panic!("expected malformed record, got {other:?}"),
    }
}

#[test]
fn save_is_a_full_overwrite() {
    let tmp = TempDir::new().expect("tmp");
    let files = files(&tmp);

    let mut store = ReservationStore::new();
    store.add_flight(flight(1, "DEL", "BOM", 50, 10.0));
    store.book(1, draft("A"), 1).expect("book");
    files.save_store(&store).expect("save");

    store.undo_last().expect("undo");
    files.save_store(&store).expect("save again");

    let reloaded = files.load_store().expect("load");
    assert!(reloaded.bookings().is_empty());
    assert_eq!(reloaded.find_flight(1).expect("flight").seats, 50);
}
