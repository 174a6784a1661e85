//! Single-writer runtime: one task owns the store, callers talk to it over
//! a bounded command channel and observe it over a broadcast event stream.
//!
//! The core store is `&mut self`-synchronous by design; serializing every
//! lookup-then-mutate sequence through this loop is what makes it safe to
//! expose to concurrent callers.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    booking::{Booking, BookingDraft, BookingReceipt, UndoOutcome},
    core::store::{ReservationStore, StoreError},
    flight::Flight,
    persist::{PersistError, SnapshotSink},
    types::{FlightId, PassengerId},
};

use super::events::LedgerEvent;

/// Errors surfaced through the runtime handle.
#[derive(Debug)]
pub enum RuntimeError {
    /// The store rejected the operation.
    Store(StoreError),
    /// The snapshot sink failed.
    Persist(PersistError),
    /// The runtime loop is gone.
    ChannelClosed,
}

impl From<StoreError> for RuntimeError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PersistError> for RuntimeError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Runtime tuning knobs.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the command channel.
    pub cmd_queue_bound: usize,
    /// Capacity of the broadcast event channel.
    pub event_capacity: usize,
    /// Flush both catalogs to the sink before the loop exits.
    pub save_on_shutdown: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cmd_queue_bound: 256,
            event_capacity: 1024,
            save_on_shutdown: true,
        }
    }
}

/// Cloneable handle to the runtime loop.
pub struct SkybookHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LedgerEvent>,
}

impl Clone for SkybookHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    AddFlight {
        flight: Flight,
        resp: oneshot::Sender<FlightId>,
    },
    Flights {
        resp: oneshot::Sender<Vec<Flight>>,
    },
    DestinationsFrom {
        origin: String,
        resp: oneshot::Sender<Option<Vec<String>>>,
    },
    Book {
        flight_id: FlightId,
        draft: BookingDraft,
        seats: u32,
        resp: oneshot::Sender<Result<BookingReceipt, RuntimeError>>,
    },
    Undo {
        resp: oneshot::Sender<Result<UndoOutcome, RuntimeError>>,
    },
    CheckInNext {
        resp: oneshot::Sender<Result<Booking, RuntimeError>>,
    },
    CheckinQueue {
        resp: oneshot::Sender<Vec<Booking>>,
    },
    PassengersSorted {
        resp: oneshot::Sender<Vec<Booking>>,
    },
    FindPassenger {
        pid: PassengerId,
        resp: oneshot::Sender<Option<Booking>>,
    },
    SearchPassenger {
        pid: PassengerId,
        resp: oneshot::Sender<Result<Booking, RuntimeError>>,
    },
    Save {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Spawns the runtime loop and returns a handle to it.
///
/// With `sink: None` the store is purely in-memory and `save` is a no-op.
pub fn spawn_skybook(
    store: ReservationStore,
    sink: Option<Box<dyn SnapshotSink>>,
    config: RuntimeConfig,
) -> SkybookHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.cmd_queue_bound);
    let (events_tx, _) = broadcast::channel::<LedgerEvent>(config.event_capacity);

    let sink = sink.map(|s| Arc::new(Mutex::new(s)));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;
        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &mut store, &events_tx_loop, sink.as_ref(), &config).await;
            if done {
                break;
            }
        }
        debug!("runtime loop exiting");
    });

    SkybookHandle { cmd_tx, events_tx }
}

impl SkybookHandle {
    /// Subscribes to the runtime event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events_tx.subscribe()
    }

    /// Adds a flight to the catalog; returns its caller-assigned id.
    pub async fn add_flight(&self, flight: Flight) -> Result<FlightId, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AddFlight { flight, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// All flights in insertion order.
    pub async fn flights(&self) -> Result<Vec<Flight>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flights { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Destinations reachable from `origin`, `None` when there are none.
    pub async fn destinations_from(
        &self,
        origin: impl Into<String>,
    ) -> Result<Option<Vec<String>>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::DestinationsFrom {
                origin: origin.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Books seats on a flight.
    pub async fn book(
        &self,
        flight_id: FlightId,
        draft: BookingDraft,
        seats: u32,
    ) -> Result<BookingReceipt, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Book {
                flight_id,
                draft,
                seats,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Reverses the most recent booking.
    pub async fn undo_last(&self) -> Result<UndoOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Undo { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Checks in the passenger at the front of the queue.
    pub async fn check_in_next(&self) -> Result<Booking, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CheckInNext { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Pending check-ins in FIFO order.
    pub async fn checkin_queue(&self) -> Result<Vec<Booking>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CheckinQueue { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// All bookings sorted ascending by passenger id.
    pub async fn passengers_sorted(&self) -> Result<Vec<Booking>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::PassengersSorted { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Linear self-lookup by passenger id.
    pub async fn find_passenger(&self, pid: PassengerId) -> Result<Option<Booking>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::FindPassenger { pid, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Admin sorted-then-binary search by passenger id.
    pub async fn search_passenger(&self, pid: PassengerId) -> Result<Booking, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SearchPassenger { pid, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Flushes both catalogs to the snapshot sink. No-op without a sink.
    pub async fn save(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Save { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the runtime loop, saving first when configured to.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    store: &mut ReservationStore,
    events_tx: &broadcast::Sender<LedgerEvent>,
    sink: Option<&Arc<Mutex<Box<dyn SnapshotSink>>>>,
    config: &RuntimeConfig,
) -> bool {
    match cmd {
        Command::AddFlight { flight, resp } => {
            let id = store.add_flight(flight);
            let _ = events_tx.send(LedgerEvent::FlightAdded { id });
            let _ = resp.send(id);
        }
        Command::Flights { resp } => {
            let _ = resp.send(store.flights().to_vec());
        }
        Command::DestinationsFrom { origin, resp } => {
            let _ = resp.send(store.destinations_from(&origin).map(<[String]>::to_vec));
        }
        Command::Book {
            flight_id,
            draft,
            seats,
            resp,
        } => {
            let res = store
                .book(flight_id, draft, seats)
                .map_err(RuntimeError::from)
                .inspect(|receipt| {
                    let _ = events_tx.send(LedgerEvent::Booked {
                        passenger_id: receipt.passenger_id,
                    });
                });
            let _ = resp.send(res);
        }
        Command::Undo { resp } => {
            let res = store
                .undo_last()
                .map_err(RuntimeError::from)
                .inspect(|outcome| {
                    let _ = events_tx.send(LedgerEvent::UndoApplied {
                        passenger_id: outcome.booking.passenger_id,
                    });
                });
            let _ = resp.send(res);
        }
        Command::CheckInNext { resp } => {
            let res = store
                .check_in_next()
                .map_err(RuntimeError::from)
                .inspect(|booking| {
                    let _ = events_tx.send(LedgerEvent::CheckedIn {
                        passenger_id: booking.passenger_id,
                    });
                });
            let _ = resp.send(res);
        }
        Command::CheckinQueue { resp } => {
            let _ = resp.send(store.checkin_queue().cloned().collect());
        }
        Command::PassengersSorted { resp } => {
            let _ = resp.send(store.passengers_sorted());
        }
        Command::FindPassenger { pid, resp } => {
            let _ = resp.send(store.find_passenger(pid).cloned());
        }
        Command::SearchPassenger { pid, resp } => {
            let _ = resp.send(store.search_passenger(pid).map_err(RuntimeError::from));
        }
        Command::Save { resp } => {
            let res = save_snapshot(store, sink, events_tx).await;
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let res = if config.save_on_shutdown {
                save_snapshot(store, sink, events_tx).await
            } else {
                Ok(())
            };
            let _ = resp.send(res);
            return true;
        }
    }

    false
}

async fn save_snapshot(
    store: &ReservationStore,
    sink: Option<&Arc<Mutex<Box<dyn SnapshotSink>>>>,
    events_tx: &broadcast::Sender<LedgerEvent>,
) -> Result<(), RuntimeError> {
    let Some(sink) = sink else {
        return Ok(());
    };

    let flights = store.flights().to_vec();
    let bookings = store.bookings().to_vec();
    let sink_ref = Arc::clone(sink);

    tokio::task::spawn_blocking(move || {
        let mut sink = sink_ref.blocking_lock();
        sink.write_snapshot(&flights, &bookings)?;
        sink.flush()
    })
    .await
    .map_err(|e| RuntimeError::Persist(PersistError::Message(format!("join error: {e}"))))?
    .map_err(RuntimeError::from)?;

    let _ = events_tx.send(LedgerEvent::Saved);
    Ok(())
}
