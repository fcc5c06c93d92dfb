//! One-shot result handle for asynchronous catalog calls.
//!
//! # Responsibility
//! - Hand the caller a value that resolves exactly once, off the
//!   calling thread.
//!
//! # Invariants
//! - A resolved value never changes; repeated reads observe the same
//!   snapshot.
//! - Waiting returns `None` only when the producer vanished without
//!   resolving; callers treat that as an absent result.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Creates a connected resolver/handle pair.
pub(crate) fn pair<T>() -> (FetchSender<T>, Fetch<T>) {
    let (tx, rx) = mpsc::channel();
    (FetchSender { tx }, Fetch { rx, value: None })
}

/// Consumer half: a single asynchronous result.
pub struct Fetch<T> {
    rx: Receiver<T>,
    value: Option<T>,
}

impl<T> Fetch<T> {
    /// Returns the value if it already resolved, without blocking.
    pub fn try_get(&mut self) -> Option<&T> {
        if self.value.is_none() {
            if let Ok(value) = self.rx.try_recv() {
                self.value = Some(value);
            }
        }
        self.value.as_ref()
    }

    /// Blocks until resolution. `None` means the producer vanished.
    pub fn wait(&mut self) -> Option<&T> {
        if self.value.is_none() {
            if let Ok(value) = self.rx.recv() {
                self.value = Some(value);
            }
        }
        self.value.as_ref()
    }

    /// Blocks up to `timeout` for resolution.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<&T> {
        if self.value.is_none() {
            match self.rx.recv_timeout(timeout) {
                Ok(value) => self.value = Some(value),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
            }
        }
        self.value.as_ref()
    }
}

/// Producer half: resolves the handle exactly once.
pub(crate) struct FetchSender<T> {
    tx: Sender<T>,
}

impl<T> FetchSender<T> {
    /// Resolves the paired handle. A vanished consumer is normal and
    /// ignored (no cancellation support, delivery is best-effort).
    pub(crate) fn resolve(self, value: T) {
        let _ = self.tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::pair;
    use std::time::Duration;

    #[test]
    fn resolves_exactly_once_and_caches() {
        let (sender, mut fetch) = pair();
        assert!(fetch.try_get().is_none());

        sender.resolve(7);
        assert_eq!(fetch.wait(), Some(&7));
        assert_eq!(fetch.try_get(), Some(&7));
    }

    #[test]
    fn vanished_producer_reads_as_absent() {
        let (sender, mut fetch) = pair::<i32>();
        drop(sender);
        assert!(fetch.wait().is_none());
        assert!(fetch.wait_timeout(Duration::from_millis(5)).is_none());
    }
}
