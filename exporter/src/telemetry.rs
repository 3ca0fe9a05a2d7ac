// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use firehose_core::registry::{CounterKind, CounterRegistry};
use metrics::{Counter, Key, KeyName, Label, Recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const BUILD_INFO_METRIC: &str = "bsky_firehose_exporter_build_info";

/// Build metadata attached to the build info gauge. Filled from compile-time
/// environment (`BUILT_BY`, `GIT_COMMIT`, `BUILD_DATE`, `BUILD_VERSION`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub built_by: String,
    pub commit: String,
    pub date: String,
    pub version: String,
}

impl BuildInfo {
    pub fn from_env() -> Self {
        Self {
            built_by: option_env!("BUILT_BY").unwrap_or("unknown").to_string(),
            commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
            date: option_env!("BUILD_DATE").unwrap_or("unknown").to_string(),
            version: option_env!("BUILD_VERSION")
                .unwrap_or(env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// Initialize logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "firehose_exporter=info,firehose_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// A Prometheus recorder private to one counter registry.
///
/// Nothing is installed globally, so every exposition renders only the
/// registry it is handed.
#[derive(Clone)]
pub struct MetricsExposition {
    handle: PrometheusHandle,
    counters: Vec<(CounterKind, Counter)>,
}

impl MetricsExposition {
    /// Register counter descriptions and the build info gauge.
    pub fn new(build: &BuildInfo) -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();

        let counters = CounterKind::ALL
            .iter()
            .map(|&kind| {
                recorder.describe_counter(KeyName::from(kind.name()), None, kind.help().into());
                (kind, recorder.register_counter(&Key::from_name(kind.name())))
            })
            .collect();

        recorder.describe_gauge(
            KeyName::from(BUILD_INFO_METRIC),
            None,
            "Build info about the bsky_firehose_exporter".into(),
        );
        let labels = vec![
            Label::new("builtBy", build.built_by.clone()),
            Label::new("commit", build.commit.clone()),
            Label::new("date", build.date.clone()),
            Label::new("version", build.version.clone()),
        ];
        recorder
            .register_gauge(&Key::from_parts(BUILD_INFO_METRIC, labels))
            .set(1.0);

        Self {
            handle: recorder.handle(),
            counters,
        }
    }

    /// Publish the registry's current values and render the text exposition.
    pub fn render(&self, registry: &CounterRegistry) -> String {
        for (kind, counter) in &self.counters {
            counter.absolute(registry.get(*kind));
        }
        self.handle.render()
    }
}
