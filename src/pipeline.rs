// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-event handler wiring the classifier to the counter registry.

use std::sync::Arc;

use crate::classifier::classify;
use crate::error::Result;
use crate::event::Event;
use crate::registry::CounterRegistry;
use crate::scheduler::EventHandler;

/// Classifies every operation of an event and bumps the matching counters.
#[derive(Clone, Debug)]
pub struct RecordCounter {
    registry: Arc<CounterRegistry>,
}

impl RecordCounter {
    pub fn new(registry: Arc<CounterRegistry>) -> Self {
        Self { registry }
    }

    /// Apply one event, returning how many operations were counted.
    pub fn count(&self, event: &Event) -> usize {
        let mut counted = 0;
        for op in &event.ops {
            if let Some(kind) = classify(op) {
                self.registry.increment(kind);
                counted += 1;
            }
        }
        tracing::trace!(source = %event.source, seq = event.seq, ops = event.ops.len(), counted, "event classified");
        counted
    }
}

impl EventHandler for RecordCounter {
    fn handle(&self, event: Event) -> Result<()> {
        self.count(&event);
        Ok(())
    }
}
