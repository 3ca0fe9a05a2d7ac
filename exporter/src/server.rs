// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
    Router,
};
use firehose_core::registry::CounterRegistry;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::errors::ExporterError;
use crate::telemetry::MetricsExposition;

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// What the scrape handler reads from.
#[derive(Clone)]
pub struct ScrapeState {
    pub registry: Arc<CounterRegistry>,
    pub exposition: MetricsExposition,
}

/// Router exposing the metrics at `metrics_path` and nothing else.
pub fn build_router(state: ScrapeState, metrics_path: &str) -> Router {
    Router::new()
        .route(metrics_path, get(metrics_handler))
        .with_state(state)
}

/// Bind the scrape listener. The unspecified IPv6 address falls back to
/// IPv4 on hosts without IPv6.
pub async fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ExporterError> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if addr.ip().is_unspecified() && addr.is_ipv6() => {
            tracing::warn!(error = %e, %addr, "IPv6 bind failed, falling back to IPv4");
            let fallback = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), addr.port());
            Ok(TcpListener::bind(fallback).await?)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ExporterError> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the server on its own task so scrapes keep being answered while the
/// consumer is blocked on a full worker queue.
pub fn spawn_server(listener: TcpListener, app: Router) -> JoinHandle<Result<(), ExporterError>> {
    tokio::spawn(serve(listener, app))
}

async fn metrics_handler(State(state): State<ScrapeState>) -> impl IntoResponse {
    let body = state.exposition.render(&state.registry);
    ([(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body)
}
