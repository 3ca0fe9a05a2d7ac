// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stream Consumer
//!
//! Bridges the firehose transport to the scheduler. Commit events are
//! submitted strictly in arrival order; everything else on the stream is
//! skipped.
//!
//! # Failure policy
//! - The first connection must succeed, otherwise `run` returns the error
//! - Undecodable frames are logged and skipped
//! - A dropped stream is resubscribed from the last submitted `seq`, with
//!   bounded backoff; running out of attempts is fatal

use std::sync::Arc;

use firehose_core::event::Event;
use firehose_core::scheduler::{Scheduler, TrySubmitError};
use futures::{Stream, StreamExt};
use tracing::{debug, info, trace, warn};

use crate::errors::ExporterError;
use crate::network::{Backoff, FirehoseClient, Frame, ReconnectPolicy};

pub struct StreamConsumer {
    scheduler: Arc<Scheduler>,
    cursor: Option<u64>,
    submitted: u64,
}

impl StreamConsumer {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self {
            scheduler,
            cursor: None,
            submitted: 0,
        }
    }

    /// `seq` of the last event handed to the scheduler.
    pub fn cursor(&self) -> Option<u64> {
        self.cursor
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Drain one connection's frames into the scheduler.
    ///
    /// Returns `Ok(())` when the stream ends cleanly and an error when the
    /// connection is lost or the scheduler stops accepting events.
    pub async fn consume<S>(&mut self, mut frames: S) -> Result<(), ExporterError>
    where
        S: Stream<Item = Result<Frame, ExporterError>> + Unpin,
    {
        while let Some(item) = frames.next().await {
            match item {
                Ok(Frame::Commit(event)) => {
                    let seq = event.seq;
                    self.submit(event)?;
                    self.cursor = Some(seq);
                    self.submitted += 1;
                }
                Ok(Frame::Other { kind }) => {
                    trace!(%kind, "skipping non-commit frame");
                }
                Ok(Frame::Error { error, message }) => {
                    return Err(ExporterError::Upstream { error, message });
                }
                Err(ExporterError::Decode(e)) => {
                    warn!(error = %e, "skipping undecodable frame");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn submit(&self, event: Event) -> Result<(), ExporterError> {
        match self.scheduler.try_submit(event) {
            Ok(()) => Ok(()),
            Err(TrySubmitError::Full(event)) => {
                debug!(
                    source = %event.source,
                    depths = ?self.scheduler.queue_depths(),
                    "worker queue full, waiting"
                );
                let scheduler = &self.scheduler;
                tokio::task::block_in_place(|| scheduler.submit(event))?;
                Ok(())
            }
            Err(TrySubmitError::Disconnected(event)) => Err(ExporterError::Core(
                firehose_core::error::CoreError::SchedulerClosed {
                    worker: self.scheduler.partition(&event.source),
                },
            )),
        }
    }

    /// Connect and consume until a fatal error.
    pub async fn run(&mut self, client: &FirehoseClient, policy: &ReconnectPolicy) -> Result<(), ExporterError> {
        let mut frames = client.connect(None).await?;
        let mut backoff = Backoff::new(policy.clone());

        loop {
            match self.consume(&mut frames).await {
                Ok(()) => info!(cursor = ?self.cursor, "firehose stream ended"),
                Err(e) if e.is_stream_loss() => warn!(error = %e, cursor = ?self.cursor, "firehose stream lost"),
                Err(e) => return Err(e),
            }

            frames = loop {
                let Some(delay) = backoff.next_backoff() else {
                    return Err(ExporterError::ReconnectExhausted { attempts: backoff.attempt() });
                };
                tokio::time::sleep(delay).await;
                match client.connect(self.cursor).await {
                    Ok(frames) => {
                        backoff.reset();
                        break frames;
                    }
                    Err(e) => warn!(error = %e, attempt = backoff.attempt(), "reconnect failed"),
                }
            };
        }
    }
}
