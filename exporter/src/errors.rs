// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use firehose_core::error::CoreError;
use thiserror::Error;

use crate::network::frame::FrameError;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Frame decode error: {0}")]
    Decode(#[from] FrameError),
    #[error("Upstream error frame: {error} ({message})")]
    Upstream { error: String, message: String },
    #[error("Gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// Errors that end the current connection but leave the consumer able to
    /// resubscribe.
    pub fn is_stream_loss(&self) -> bool {
        matches!(self, ExporterError::Transport(_) | ExporterError::Upstream { .. })
    }
}
