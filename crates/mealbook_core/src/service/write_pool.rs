//! Fixed-size background executor for local store mutations.
//!
//! # Responsibility
//! - Run store writes off the UI-owning thread on a small worker
//!   pool.
//!
//! # Invariants
//! - Jobs submitted to different workers have no cross-worker
//!   ordering guarantee; row-level conflicts are serialized by the
//!   store's connection lock.
//! - Dropping the pool drains queued jobs before the workers exit.

use log::error;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{Builder, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared job queue with a fixed set of worker threads.
pub struct WritePool {
    tx: Mutex<Option<Sender<Job>>>,
    workers: Vec<JoinHandle<()>>,
}

impl WritePool {
    /// Spawns `size` workers (at least one) draining one shared
    /// queue.
    pub fn new(size: usize) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(size.max(1));
        for index in 0..size.max(1) {
            let rx = Arc::clone(&rx);
            let spawned = Builder::new()
                .name(format!("mealbook-write-{index}"))
                .spawn(move || worker_loop(&rx));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    error!("event=pool_spawn module=service status=error worker={index} error={err}");
                }
            }
        }

        Self {
            tx: Mutex::new(Some(tx)),
            workers,
        }
    }

    /// Enqueues a job; returns immediately. Jobs are responsible for
    /// their own error reporting.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        let guard = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(tx) if tx.send(Box::new(job)).is_ok() => {}
            _ => error!("event=pool_submit module=service status=dropped"),
        }
    }
}

impl Drop for WritePool {
    fn drop(&mut self) {
        // Closing the channel lets each worker finish its queue and
        // stop.
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(rx: &Arc<Mutex<Receiver<Job>>>) {
    loop {
        let next = rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        match next {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}
