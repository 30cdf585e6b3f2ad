//! Telemetry for the response crafter
//!
//! Structured logging via the `tracing` ecosystem, with optional OTLP trace
//! export so error responses can carry the active trace id.

mod metadata;

use crafter_config::{ExportProtocol, ExporterConfig, TelemetryConfig};
use opentelemetry::{global, trace::TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};
use tracing::Subscriber;
use tracing_subscriber::{Layer, registry::LookupSpan};

/// Guard that ensures proper cleanup of telemetry resources on drop
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Force flush all pending spans immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the tracer provider fails to flush
    pub fn force_flush(&self) -> anyhow::Result<()> {
        if let Some(ref provider) = self.tracer_provider {
            provider
                .force_flush()
                .map_err(|e| anyhow::anyhow!("failed to flush spans: {e}"))?;
        }
        Ok(())
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize telemetry from configuration
///
/// Sets up the `tracing-subscriber` with optional OTLP trace export.
/// Returns a guard that must be held for the lifetime of the application.
///
/// # Errors
///
/// Returns an error if OTLP exporter initialization fails
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.is_some_and(|c| c.json_logs);

    let mut guard = TelemetryGuard { tracer_provider: None };

    match config {
        Some(telemetry_config) if telemetry_config.exporter.is_some() => {
            let resource = metadata::build_resource(telemetry_config);

            let tracer_provider = init_tracer(telemetry_config, resource)?;
            let tracer = tracer_provider.tracer("crafter");
            let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
            global::set_tracer_provider(tracer_provider.clone());
            global::set_text_map_propagator(TraceContextPropagator::new());
            guard.tracer_provider = Some(tracer_provider);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer(json))
                .with(otel_layer)
                .init();
        }
        _ => {
            tracing_subscriber::registry().with(filter).with(fmt_layer(json)).init();
        }
    }

    Ok(guard)
}

/// Trace id of the current span's OpenTelemetry context
///
/// Returns `None` when no valid trace is active, e.g. when OTLP export is
/// not configured.
pub fn current_trace_id() -> Option<String> {
    use opentelemetry::trace::TraceContextExt;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let context = tracing::Span::current().context();
    let span = context.span();
    let span_context = span.span_context();

    span_context.is_valid().then(|| span_context.trace_id().to_string())
}

fn fmt_layer<S>(json: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json { layer.json().boxed() } else { layer.boxed() }
}

/// Initialize OTLP trace export
fn init_tracer(config: &TelemetryConfig, resource: opentelemetry_sdk::Resource) -> anyhow::Result<SdkTracerProvider> {
    let exporter_config = config
        .exporter
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no trace exporter configured"))?;

    let exporter = build_span_exporter(exporter_config)?;

    let sampler = if config.sampling_rate >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_rate)
    };

    let effective_sampler = if config.parent_based {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    };

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(effective_sampler)
        .with_batch_exporter(exporter)
        .build();

    Ok(provider)
}

/// Build OTLP span exporter based on protocol
fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::SpanExporter;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}
