// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bounded exponential backoff for resubscribing after the stream drops.

use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Attempts allowed after a drop; `0` makes any drop fatal.
    pub max_retries: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            max_retries: 10,
        }
    }
}

#[derive(Debug)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempt: u32,
    current_delay: Duration,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        let current_delay = policy.initial_delay;
        Self {
            policy,
            attempt: 0,
            current_delay,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Called after a connection is established again.
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.current_delay = self.policy.initial_delay;
    }

    /// Delay before the next attempt, or `None` once retries are used up.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.attempt >= self.policy.max_retries {
            warn!(attempts = self.attempt, max = self.policy.max_retries, "reconnect attempts exhausted");
            return None;
        }
        self.attempt += 1;

        let delay = self.current_delay;
        let next_ms = (self.current_delay.as_millis() as f64 * self.policy.multiplier.max(1.0)) as u64;
        self.current_delay = Duration::from_millis(next_ms).min(self.policy.max_delay);

        Some(delay.min(self.policy.max_delay))
    }
}
