// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use clap::Parser;
use firehose_core::config::DEFAULT_SCHEDULER_NAME;
use firehose_core::pipeline::RecordCounter;
use firehose_core::registry::CounterRegistry;
use firehose_core::scheduler::Scheduler;
use firehose_exporter::config::Cli;
use firehose_exporter::consumer::StreamConsumer;
use firehose_exporter::network::FirehoseClient;
use firehose_exporter::server::{bind_listener, build_router, spawn_server, ScrapeState};
use firehose_exporter::telemetry::{init_tracing, BuildInfo, MetricsExposition};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let result = run(Cli::parse()).await;
    if let Err(e) = &result {
        tracing::error!("Exporter stopped: {:#}", e);
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = cli.into_config()?;
    tracing::debug!("Starting with config: {:?}", cfg);

    // tokio-tungstenite leaves the rustls provider choice to the binary.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let registry = Arc::new(CounterRegistry::new());
    let app = build_router(
        ScrapeState {
            registry: registry.clone(),
            exposition: MetricsExposition::new(&BuildInfo::from_env()),
        },
        &cfg.metrics_path,
    );
    let listener = bind_listener(cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    tracing::info!(
        web.listen_address = %listener.local_addr()?,
        web.metrics_path = %cfg.metrics_path,
        "Starting metrics server"
    );

    let scheduler = Arc::new(Scheduler::new(
        DEFAULT_SCHEDULER_NAME,
        cfg.scheduler,
        RecordCounter::new(registry),
    )?);
    let client = FirehoseClient::new(cfg.firehose_url.clone());
    let mut consumer = StreamConsumer::new(scheduler);

    let server = spawn_server(listener, app);

    tracing::info!("Exporter started, beginning to slurp the stream");
    tokio::select! {
        res = server => res.context("metrics server panicked")?.context("metrics server failed")?,
        res = consumer.run(&client, &cfg.reconnect) => res.context("firehose consumer failed")?,
    }
    Ok(())
}
