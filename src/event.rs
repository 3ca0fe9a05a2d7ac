// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Repository change events.
//!
//! An [`Event`] is one commit from the firehose: the repository it came from,
//! the transport sequence number, and the record operations it carries.
//!
//! # Invariants
//! - Events are immutable once built
//! - The `source` key decides which worker processes the event

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

/// The kind of change applied to a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record change inside a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub action: Action,
    /// `<collection>/<rkey>`
    pub path: String,
}

impl Operation {
    pub fn new(action: Action, path: impl Into<String>) -> Self {
        Self { action, path: path.into() }
    }

    /// The record-type namespace, i.e. everything before the first `/`.
    ///
    /// A path without a separator is treated as a bare collection.
    pub fn collection(&self) -> &str {
        match self.path.split_once('/') {
            Some((collection, _rkey)) => collection,
            None => &self.path,
        }
    }

    pub fn rkey(&self) -> Option<&str> {
        self.path.split_once('/').map(|(_, rkey)| rkey)
    }
}

/// One repository commit taken off the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Repository DID; also the ordering partition key.
    pub source: String,
    pub seq: u64,
    pub ops: Vec<Operation>,
}

impl Event {
    pub fn new(source: impl Into<String>, seq: u64, ops: Vec<Operation>) -> Self {
        Self {
            source: source.into(),
            seq,
            ops,
        }
    }
}
