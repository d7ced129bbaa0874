//! Logging and trace export
//!
//! Console output is always on. When `logging.otlp_endpoint` is set, spans
//! and log events are additionally shipped to an OTLP/HTTP collector.

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::VERSION;
use crate::config::LoggingConfig;

const SERVICE_NAME: &str = "tripscout";

/// Keeps the exporters alive; flushes and shuts them down on drop.
#[must_use = "dropping the guard stops trace export"]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {e}");
            }
        }
        if let Some(provider) = self.logger_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down logger provider: {e}");
            }
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init(config: &LoggingConfig) -> Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (pretty, json) = if config.format == "json" {
        (None, Some(fmt::layer().json().with_current_span(true)))
    } else {
        (Some(fmt::layer().with_target(true)), None)
    };

    let (tracer_provider, logger_provider) = match config.otlp_endpoint.as_deref() {
        Some(endpoint) => {
            let (tracer, logger) = otlp_providers(endpoint)?;
            (Some(tracer), Some(logger))
        }
        None => (None, None),
    };

    let trace_layer = tracer_provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME)));
    // The exporter's own HTTP stack must not feed back into the log pipeline
    let log_layer = logger_provider.as_ref().map(|provider| {
        OpenTelemetryTracingBridge::new(provider).with_filter(filter_fn(|meta| {
            let target = meta.target();
            !["opentelemetry", "hyper", "reqwest", "h2", "tower"]
                .iter()
                .any(|noisy| target.starts_with(noisy))
        }))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(trace_layer)
        .with(log_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(TelemetryGuard {
        tracer_provider,
        logger_provider,
    })
}

fn otlp_providers(endpoint: &str) -> Result<(SdkTracerProvider, SdkLoggerProvider)> {
    let endpoint = endpoint.trim_end_matches('/');
    let resource = Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new(SERVICE_VERSION, VERSION))
        .build();

    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(format!("{endpoint}/v1/traces"))
        .build()
        .context("Failed to build OTLP span exporter")?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = LogExporter::builder()
        .with_http()
        .with_endpoint(format!("{endpoint}/v1/logs"))
        .build()
        .context("Failed to build OTLP log exporter")?;
    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok((tracer_provider, logger_provider))
}
