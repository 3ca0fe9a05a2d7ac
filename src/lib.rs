// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! firehose-core: ordered, parallel classification of repository change events.
//!
//! The crate has no network or async dependencies. It turns a single ordered
//! stream of [`event::Event`]s into counter increments on a
//! [`registry::CounterRegistry`], fanning the work out across a fixed pool of
//! worker threads while keeping every repository's events in arrival order.

pub mod config;
pub mod error;
pub mod event;
pub mod classifier;
pub mod registry;
pub mod scheduler;
pub mod pipeline;

#[cfg(test)]
pub mod tests;
