// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record Classifier
//!
//! Maps a single [`Operation`] to the counter it should bump, if any. Only
//! `create` actions count; the rule table is closed and evaluated in order.

use crate::event::{Action, Operation};
use crate::registry::CounterKind;

/// Ordered `(collection substring, counter)` rules. First match wins.
pub const RULES: &[(&str, CounterKind)] = &[
    ("app.bsky.graph.block", CounterKind::Blocks),
    ("app.bsky.feed.like", CounterKind::Likes),
    ("app.bsky.graph.follow", CounterKind::Follows),
    ("app.bsky.feed.post", CounterKind::Posts),
    ("app.bsky.feed.repost", CounterKind::Reposts),
];

/// Decide which counter, if any, an operation contributes to.
///
/// Updates, deletes and collections outside the rule table yield `None`.
pub fn classify(op: &Operation) -> Option<CounterKind> {
    if op.action != Action::Create {
        return None;
    }
    let collection = op.collection();
    RULES
        .iter()
        .find(|(needle, _)| collection.contains(needle))
        .map(|(_, kind)| *kind)
}
