//! Snapshot subscription primitive for live store queries.
//!
//! # Responsibility
//! - Deliver an initial query snapshot plus every refresh that
//!   follows a committed write.
//!
//! # Invariants
//! - Consumers always observe whole snapshots, never deltas.
//! - A dropped subscription makes the producer side report dead so
//!   the store can prune it.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Creates a connected snapshot channel seeded with `initial`.
pub(crate) fn channel<T>(initial: T) -> (LiveSender<T>, Live<T>) {
    let (tx, rx) = mpsc::channel();
    (
        LiveSender { tx },
        Live {
            rx,
            current: initial,
        },
    )
}

/// Consumer half of a live query: the latest snapshot plus a stream
/// of refreshes.
///
/// Every emission is the current state of the query, so readers treat
/// [`Live::get`] as "what is true now" and [`Live::wait_update`] as
/// "block until something changed".
pub struct Live<T> {
    rx: Receiver<T>,
    current: T,
}

impl<T: Clone> Live<T> {
    /// Returns the most recent snapshot, absorbing any queued
    /// refreshes first.
    pub fn get(&mut self) -> T {
        self.drain();
        self.current.clone()
    }

    /// Blocks up to `timeout` for the next refresh. Returns the new
    /// snapshot, or `None` when nothing arrived in time (including
    /// when the store side is gone).
    pub fn wait_update(&mut self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => {
                self.current = value;
                self.drain();
                Some(self.current.clone())
            }
            Err(_) => None,
        }
    }

    fn drain(&mut self) {
        while let Ok(value) = self.rx.try_recv() {
            self.current = value;
        }
    }
}

/// Producer half held by the store's watcher registry.
pub(crate) struct LiveSender<T> {
    tx: Sender<T>,
}

impl<T> LiveSender<T> {
    /// Pushes a refresh; returns false once the consumer is gone.
    pub(crate) fn send(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::channel;
    use std::time::Duration;

    #[test]
    fn get_returns_initial_then_latest_snapshot() {
        let (sender, mut live) = channel(vec![1]);
        assert_eq!(live.get(), vec![1]);

        assert!(sender.send(vec![1, 2]));
        assert!(sender.send(vec![1, 2, 3]));
        assert_eq!(live.get(), vec![1, 2, 3]);
    }

    #[test]
    fn wait_update_times_out_without_refreshes() {
        let (_sender, mut live) = channel(0);
        assert_eq!(live.wait_update(Duration::from_millis(10)), None);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn dropped_consumer_is_reported_to_producer() {
        let (sender, live) = channel(0);
        drop(live);
        assert!(!sender.send(1));
    }
}
