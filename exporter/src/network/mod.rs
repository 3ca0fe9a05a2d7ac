// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Firehose transport: websocket subscription, frame decoding and reconnect
//! backoff.

pub mod backoff;
pub mod client;
pub mod frame;

pub use backoff::{Backoff, ReconnectPolicy};
pub use client::{FirehoseClient, FrameStream, DEFAULT_FIREHOSE_URL};
pub use frame::{decode_frame, Frame, FrameError};
