//! Logging, tracing and metrics setup for the freight admin panel.
//!
//! - **Logging**: `tracing-subscriber` with env-filter, JSON or compact output
//! - **Tracing export**: OpenTelemetry OTLP (feature `otlp`)
//! - **Metrics**: Prometheus recorder for the `/metrics` endpoint (feature `prometheus`)

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "prometheus")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "otlp")]
use opentelemetry::KeyValue;
#[cfg(feature = "otlp")]
use opentelemetry::trace::TracerProvider as _;
#[cfg(feature = "otlp")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otlp")]
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider},
};

/// Service name reported in traces.
pub const SERVICE_NAME: &str = "freight-admin";

/// Noisy dependency targets capped below the service log level.
const QUIET_TARGETS: &[&str] = &[
    "sqlx::query=warn",
    "tower=info",
    "h2=info",
    "hyper=info",
    "tonic=info",
];

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
    pub json_logs: bool,
    pub otlp_endpoint: Option<String>,
    /// Environment name (e.g., "production", "staging")
    pub environment: Option<String>,
    pub version: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_logs: true,
            otlp_endpoint: None,
            environment: None,
            version: None,
        }
    }
}

/// Active telemetry handles that need graceful shutdown.
pub struct TelemetryGuard {
    #[cfg(feature = "otlp")]
    otel_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Flush and shut down exporters.
    pub fn shutdown(self) {
        #[cfg(feature = "otlp")]
        if let Some(provider) = self.otel_provider
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown OpenTelemetry provider: {e}");
        }
    }
}

/// Install the Prometheus recorder and return the handle rendering `/metrics`.
///
/// # Panics
/// Panics if a global metrics recorder is already installed.
#[cfg(feature = "prometheus")]
#[must_use]
pub fn init_metrics() -> PrometheusHandle {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

#[cfg(feature = "otlp")]
fn init_opentelemetry(config: &TelemetryConfig) -> Option<SdkTracerProvider> {
    let endpoint = config.otlp_endpoint.as_deref()?;

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(std::time::Duration::from_secs(5))
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("OTLP exporter disabled: {e}");
            return None;
        }
    };

    let mut attributes = vec![KeyValue::new("service.name", SERVICE_NAME)];
    if let Some(environment) = &config.environment {
        attributes.push(KeyValue::new("deployment.environment", environment.clone()));
    }
    if let Some(version) = &config.version {
        attributes.push(KeyValue::new("service.version", version.clone()));
    }

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(Resource::builder().with_attributes(attributes).build())
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());
    Some(provider)
}

fn parse_level(level: &str) -> Level {
    match level.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn env_filter(level: Level) -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(
            EnvFilter::from_default_env().add_directive(level.into()),
            EnvFilter::add_directive,
        )
}

/// Install the global subscriber: console output plus OTLP export when configured.
///
/// Keep the returned guard alive for the lifetime of the process.
///
/// # Panics
/// Panics if a global subscriber is already installed.
#[must_use]
pub fn setup_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let filter = env_filter(parse_level(&config.log_level));

    let fmt_layer = if config.json_logs {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
            .compact()
            .boxed()
    };

    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);

    #[cfg(feature = "otlp")]
    {
        let otel_provider = init_opentelemetry(config);
        let otel_layer = otel_provider.as_ref().map(|provider| {
            tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
        });
        registry.with(otel_layer).init();
        TelemetryGuard { otel_provider }
    }

    #[cfg(not(feature = "otlp"))]
    {
        registry.init();
        TelemetryGuard {}
    }
}
