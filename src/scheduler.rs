// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ordered Parallel Scheduler
//!
//! Fans one ordered event stream out to a fixed pool of worker threads.
//!
//! # Ordering
//! Every event is routed by a stable hash of its source key, so all events of
//! one repository land on the same worker queue and are handled in submission
//! order. Events of different repositories may run concurrently and in any
//! relative order.
//!
//! # Backpressure
//! Worker queues are bounded. `submit` blocks while the target queue is full;
//! nothing is ever dropped or reordered because of capacity.
//!
//! # Shutdown
//! Dropping the scheduler (or calling [`Scheduler::shutdown`]) closes every
//! queue and joins the workers once they have drained what was queued.

use std::hash::Hasher;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use rustc_hash::FxHasher;
use tracing::{debug, warn};

use crate::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use crate::error::{CoreError, Result};
use crate::event::Event;

/// Callback invoked once per event on a worker thread.
pub trait EventHandler: Send + Sync + 'static {
    fn handle(&self, event: Event) -> Result<()>;
}

impl<F> EventHandler for F
where
    F: Fn(Event) -> Result<()> + Send + Sync + 'static,
{
    fn handle(&self, event: Event) -> Result<()> {
        self(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CoreError::InvalidConfig("worker count must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(CoreError::InvalidConfig("queue capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Returned by [`Scheduler::try_submit`]; hands the event back to the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum TrySubmitError {
    Full(Event),
    Disconnected(Event),
}

impl TrySubmitError {
    pub fn into_event(self) -> Event {
        match self {
            TrySubmitError::Full(event) | TrySubmitError::Disconnected(event) => event,
        }
    }
}

/// Stable partition of a source key onto `workers` buckets.
///
/// `FxHasher` is unseeded, so the mapping is identical across runs.
pub fn partition_for(source: &str, workers: usize) -> usize {
    let mut hasher = FxHasher::default();
    hasher.write(source.as_bytes());
    (hasher.finish() % workers as u64) as usize
}

pub struct Scheduler {
    name: String,
    config: SchedulerConfig,
    queues: Vec<Sender<Event>>,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn `config.workers` threads, each draining its own bounded queue
    /// into `handler`.
    pub fn new<H: EventHandler>(name: &str, config: SchedulerConfig, handler: H) -> Result<Self> {
        config.validate()?;

        let handler = Arc::new(handler);
        let mut queues = Vec::with_capacity(config.workers);
        let mut workers = Vec::with_capacity(config.workers);

        for index in 0..config.workers {
            let (tx, rx) = bounded::<Event>(config.queue_capacity);
            let handler = Arc::clone(&handler);
            let spawned = thread::Builder::new()
                .name(format!("{name}-worker-{index}"))
                .spawn(move || worker_loop(index, rx, handler));

            match spawned {
                Ok(handle) => {
                    queues.push(tx);
                    workers.push(handle);
                }
                Err(e) => {
                    // Already-running workers exit once their queues close.
                    drop(queues);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(CoreError::WorkerSpawn(e.to_string()));
                }
            }
        }

        debug!(name, workers = config.workers, queue_capacity = config.queue_capacity, "scheduler started");

        Ok(Self {
            name: name.to_string(),
            config,
            queues,
            workers,
        })
    }

    /// Worker index that owns `source`.
    pub fn partition(&self, source: &str) -> usize {
        partition_for(source, self.config.workers)
    }

    /// Enqueue an event, blocking while its worker's queue is full.
    pub fn submit(&self, event: Event) -> Result<()> {
        let worker = self.partition(&event.source);
        self.queues[worker]
            .send(event)
            .map_err(|_| CoreError::SchedulerClosed { worker })
    }

    /// Enqueue without blocking.
    pub fn try_submit(&self, event: Event) -> std::result::Result<(), TrySubmitError> {
        let worker = self.partition(&event.source);
        self.queues[worker].try_send(event).map_err(|e| match e {
            TrySendError::Full(event) => TrySubmitError::Full(event),
            TrySendError::Disconnected(event) => TrySubmitError::Disconnected(event),
        })
    }

    /// Number of events waiting in each worker queue.
    pub fn queue_depths(&self) -> Vec<usize> {
        self.queues.iter().map(|q| q.len()).collect()
    }

    /// Close all queues and wait for the workers to drain them.
    pub fn shutdown(mut self) {
        self.close_and_join();
    }

    fn close_and_join(&mut self) {
        self.queues.clear();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!(name = %self.name, "worker thread exited abnormally");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn worker_loop<H: EventHandler>(index: usize, rx: Receiver<Event>, handler: Arc<H>) {
    // recv() fails only once the queue is closed and empty.
    while let Ok(event) = rx.recv() {
        let source = event.source.clone();
        let seq = event.seq;
        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(worker = index, %source, seq, error = %e, "event handler failed");
            }
            Err(_) => {
                warn!(worker = index, %source, seq, "event handler panicked");
            }
        }
    }
    debug!(worker = index, "worker drained and stopped");
}
