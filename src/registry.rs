// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Counter Registry
//!
//! Holds one monotonic counter per tracked record type. Counters are plain
//! `AtomicU64`s: workers increment them concurrently and the scrape path reads
//! them without taking any lock.
//!
//! # Guarantees
//! - No lost updates under concurrent `increment`
//! - A read never observes fewer increments than had completed before it
//! - Values are never reset or decremented for the life of the registry

use std::sync::atomic::{AtomicU64, Ordering};

const COUNTER_COUNT: usize = 5;

/// The fixed set of tracked record types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Blocks,
    Follows,
    Likes,
    Posts,
    Reposts,
}

impl CounterKind {
    pub const ALL: [CounterKind; COUNTER_COUNT] = [
        CounterKind::Blocks,
        CounterKind::Follows,
        CounterKind::Likes,
        CounterKind::Posts,
        CounterKind::Reposts,
    ];

    /// Exposition name of the counter.
    pub fn name(&self) -> &'static str {
        match self {
            CounterKind::Blocks => "bsky_blocks_total",
            CounterKind::Follows => "bsky_follows_total",
            CounterKind::Likes => "bsky_likes_total",
            CounterKind::Posts => "bsky_posts_total",
            CounterKind::Reposts => "bsky_reposts_total",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            CounterKind::Blocks => "Number of Bluesky blocks",
            CounterKind::Follows => "Number of Bluesky follows",
            CounterKind::Likes => "Number of Bluesky likes",
            CounterKind::Posts => "Number of Bluesky posts",
            CounterKind::Reposts => "Number of Bluesky reposts",
        }
    }

    fn slot(&self) -> usize {
        match self {
            CounterKind::Blocks => 0,
            CounterKind::Follows => 1,
            CounterKind::Likes => 2,
            CounterKind::Posts => 3,
            CounterKind::Reposts => 4,
        }
    }
}

/// Point-in-time value of one counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterSample {
    pub kind: CounterKind,
    pub name: &'static str,
    pub help: &'static str,
    pub value: u64,
}

#[derive(Debug, Default)]
pub struct CounterRegistry {
    counters: [AtomicU64; COUNTER_COUNT],
}

impl CounterRegistry {
    /// Create a registry with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, kind: CounterKind) {
        self.counters[kind.slot()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, kind: CounterKind) -> u64 {
        self.counters[kind.slot()].load(Ordering::Relaxed)
    }

    /// Read every counter.
    ///
    /// Each value is loaded independently, so the samples may straddle an
    /// in-flight increment on another worker.
    pub fn snapshot(&self) -> Vec<CounterSample> {
        CounterKind::ALL
            .iter()
            .map(|kind| CounterSample {
                kind: *kind,
                name: kind.name(),
                help: kind.help(),
                value: self.get(*kind),
            })
            .collect()
    }

    /// Sum across all counters.
    pub fn total(&self) -> u64 {
        CounterKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }
}
