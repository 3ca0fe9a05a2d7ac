// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Number of worker threads in the scheduler pool.
pub const DEFAULT_WORKERS: usize = 24;

/// Capacity of each worker's queue before `submit` starts to block.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Prefix used for worker thread names.
pub const DEFAULT_SCHEDULER_NAME: &str = "parallel";
