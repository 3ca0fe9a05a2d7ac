// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Firehose frame decoding.
//!
//! Every binary websocket message carries two concatenated DAG-CBOR values:
//! a header `{op, t}` followed by the body. `op == 1` is a message whose type
//! is named by `t`; `op == -1` is an error frame. Only `#commit` bodies are
//! decoded into [`Event`]s, everything else is passed through by type name.

use firehose_core::error::CoreError;
use firehose_core::event::{Action, Event, Operation};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

const OP_MESSAGE: i64 = 1;
const OP_ERROR: i64 = -1;
const COMMIT_TYPE: &str = "#commit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Commit(Event),
    /// A message type the exporter does not count (`#identity`, `#account`, ...).
    Other { kind: String },
    Error { error: String, message: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("Malformed CBOR: {0}")]
    Cbor(String),
    #[error("Unknown frame op {0}")]
    UnknownOp(i64),
    #[error("Message frame without a type")]
    MissingType,
    #[error("Negative sequence number {0}")]
    NegativeSeq(i64),
    #[error("Invalid operation: {0}")]
    Operation(#[from] CoreError),
}

#[derive(Deserialize)]
struct FrameHeader {
    op: i64,
    #[serde(default)]
    t: Option<String>,
}

#[derive(Deserialize)]
struct CommitBody {
    seq: i64,
    repo: String,
    #[serde(default)]
    ops: Vec<RepoOp>,
}

#[derive(Deserialize)]
struct RepoOp {
    action: String,
    path: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

impl CommitBody {
    fn into_event(self) -> Result<Event, FrameError> {
        let seq = u64::try_from(self.seq).map_err(|_| FrameError::NegativeSeq(self.seq))?;
        let ops = self
            .ops
            .into_iter()
            .map(|op| -> Result<Operation, FrameError> {
                Ok(Operation::new(op.action.parse::<Action>()?, op.path))
            })
            .collect::<Result<Vec<_>, FrameError>>()?;
        Ok(Event::new(self.repo, seq, ops))
    }
}

fn read_value<T: DeserializeOwned>(reader: &mut &[u8]) -> Result<T, FrameError> {
    ciborium::de::from_reader(reader).map_err(|e| FrameError::Cbor(e.to_string()))
}

pub fn decode_frame(bytes: &[u8]) -> Result<Frame, FrameError> {
    let mut reader = bytes;
    let header: FrameHeader = read_value(&mut reader)?;

    match header.op {
        OP_MESSAGE => match header.t.as_deref() {
            Some(COMMIT_TYPE) => {
                let body: CommitBody = read_value(&mut reader)?;
                Ok(Frame::Commit(body.into_event()?))
            }
            Some(kind) => Ok(Frame::Other { kind: kind.to_string() }),
            None => Err(FrameError::MissingType),
        },
        OP_ERROR => {
            let body: ErrorBody = read_value(&mut reader)?;
            Ok(Frame::Error {
                error: body.error,
                message: body.message.unwrap_or_default(),
            })
        }
        op => Err(FrameError::UnknownOp(op)),
    }
}
