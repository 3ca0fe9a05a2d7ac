// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown operation action: {0}")]
    UnknownAction(String),

    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(String),

    #[error("Worker {worker} is no longer accepting events")]
    SchedulerClosed { worker: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
