// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::pin::Pin;

use futures::{future, Stream, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info};

use crate::errors::ExporterError;
use crate::network::frame::{decode_frame, Frame};

pub const DEFAULT_FIREHOSE_URL: &str = "wss://bsky.network/xrpc/com.atproto.sync.subscribeRepos";

/// Decoded frames in arrival order. Ends when the upstream closes.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Frame, ExporterError>> + Send>>;

#[derive(Debug, Clone)]
pub struct FirehoseClient {
    base_url: String,
}

impl FirehoseClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { base_url: url.into() }
    }

    /// Subscription URL, resuming after `cursor` when one is known.
    pub fn subscribe_url(&self, cursor: Option<u64>) -> String {
        match cursor {
            None => self.base_url.clone(),
            Some(seq) => {
                let sep = if self.base_url.contains('?') { '&' } else { '?' };
                format!("{}{}cursor={}", self.base_url, sep, seq)
            }
        }
    }

    pub async fn connect(&self, cursor: Option<u64>) -> Result<FrameStream, ExporterError> {
        let url = self.subscribe_url(cursor);
        let (ws, response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| ExporterError::Connect {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        debug!(status = %response.status(), "websocket handshake complete");
        info!(url = %url, ?cursor, "Subscribed to firehose");

        Ok(Box::pin(ws.filter_map(|msg| future::ready(frame_from_message(msg)))))
    }
}

/// Map one websocket message onto the frame stream; control and text
/// messages are dropped.
pub fn frame_from_message(
    msg: Result<Message, tungstenite::Error>,
) -> Option<Result<Frame, ExporterError>> {
    match msg {
        Ok(Message::Binary(data)) => Some(decode_frame(&data).map_err(ExporterError::from)),
        Ok(Message::Close(frame)) => {
            info!(?frame, "firehose closed the connection");
            None
        }
        Ok(_) => None,
        Err(e) => Some(Err(ExporterError::Transport(e.to_string()))),
    }
}
