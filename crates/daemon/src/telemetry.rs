//! Telemetry setup for OpenTelemetry integration

use tracing_subscriber::{Layer, Registry};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the OTLP tracing layer if enabled
///
/// Returns `Ok(None)` when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset. Runs before
/// the subscriber exists, so problems are reported back as messages for the
/// caller to log once logging is up.
///
/// # Environment Variables
///
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
/// - `OTEL_SERVICE_NAME`: Service name (default: jobmatch)
///
/// # Example
///
/// ```text
/// OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
/// OTEL_SERVICE_NAME=jobmatch-dev \
///     ./jobmatch
/// ```
pub fn otel_layer() -> Result<Option<BoxedLayer>, String> {
    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        return Ok(None);
    };

    #[cfg(feature = "telemetry")]
    {
        otel_layer_impl(endpoint).map(Some)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = endpoint;
        Err("OpenTelemetry endpoint set but feature 'telemetry' not enabled \
             (rebuild with: cargo build --features telemetry)"
            .to_string())
    }
}

#[cfg(feature = "telemetry")]
fn otel_layer_impl(endpoint: String) -> Result<BoxedLayer, String> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use opentelemetry_sdk::Resource;

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "jobmatch".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| format!("Failed to build OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
}

/// Flush pending spans
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}
