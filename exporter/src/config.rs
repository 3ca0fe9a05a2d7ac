// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::Parser;
use firehose_core::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use firehose_core::scheduler::SchedulerConfig;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use crate::errors::ExporterError;
use crate::network::{ReconnectPolicy, DEFAULT_FIREHOSE_URL};

pub const DEFAULT_LISTEN_ADDRESS: &str = ":10025";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

#[derive(Parser, Debug)]
#[command(name = "bsky-firehose-exporter", version, about = "Prometheus exporter counting Bluesky firehose records")]
pub struct Cli {
    /// Address to listen on for HTTP requests.
    #[arg(long = "web.listen-address", default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// Path to expose metrics on.
    #[arg(long = "web.metrics-path", default_value = DEFAULT_METRICS_PATH)]
    pub metrics_path: String,

    /// Firehose subscription endpoint.
    #[arg(long = "firehose.url", default_value = DEFAULT_FIREHOSE_URL)]
    pub firehose_url: String,

    /// Reconnect attempts after the stream drops (0 exits on the first drop).
    #[arg(long = "firehose.max-retries", default_value_t = 10)]
    pub max_retries: u32,

    /// Upper bound on the delay between reconnect attempts.
    #[arg(long = "firehose.max-backoff-secs", default_value_t = 30)]
    pub max_backoff_secs: u64,

    /// Number of classification workers.
    #[arg(long = "scheduler.workers", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Events buffered per worker before the stream is throttled.
    #[arg(long = "scheduler.queue-capacity", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen_addr: SocketAddr,
    pub metrics_path: String,
    pub firehose_url: String,
    pub scheduler: SchedulerConfig,
    pub reconnect: ReconnectPolicy,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 10025),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            firehose_url: DEFAULT_FIREHOSE_URL.to_string(),
            scheduler: SchedulerConfig::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl Cli {
    pub fn into_config(self) -> Result<ExporterConfig, ExporterError> {
        let listen_addr = parse_listen_address(&self.listen_address)?;

        if !self.metrics_path.starts_with('/') {
            return Err(ExporterError::Config(format!(
                "metrics path must start with '/': {}",
                self.metrics_path
            )));
        }

        let scheduler = SchedulerConfig {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
        };
        scheduler.validate()?;

        let reconnect = ReconnectPolicy {
            max_retries: self.max_retries,
            max_delay: Duration::from_secs(self.max_backoff_secs.max(1)),
            ..ReconnectPolicy::default()
        };

        Ok(ExporterConfig {
            listen_addr,
            metrics_path: self.metrics_path,
            firehose_url: self.firehose_url,
            scheduler,
            reconnect,
        })
    }
}

/// Accepts `host:port` as well as the bare `:port` form, which binds every
/// interface on both address families (`[::]`, see `server::bind_listener`).
pub fn parse_listen_address(raw: &str) -> Result<SocketAddr, ExporterError> {
    let candidate = match raw.strip_prefix(':') {
        Some(port) => format!("[::]:{port}"),
        None => raw.to_string(),
    };
    candidate
        .parse()
        .map_err(|e| ExporterError::Config(format!("invalid listen address {raw:?}: {e}")))
}
