//! # Cars Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Check that the rate service is reachable
//! - Create the car service and its rate subscription
//! - Start the HTTP server

mod config;

use std::time::Duration;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cars_hex::{CarService, inbound::HttpServer};
use cars_repo::{InMemoryCarStore, SimulatedRateClient};
use cars_types::RateClient;
use currency_rates::RateTable;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("cars-service"), provider))
}

/// Calls the rate service health check until it answers, one second apart.
async fn wait_for_rate_service<C: RateClient>(client: &C, retries: u32) -> anyhow::Result<()> {
    let mut attempt = 0;
    loop {
        match client.health_check().await {
            Ok(status) => {
                tracing::info!(status = %status, "Currency server is healthy");
                return Ok(());
            }
            Err(err) if attempt < retries => {
                attempt += 1;
                tracing::warn!(error = %err, attempt, "Currency server health check failed, retrying");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(err) => {
                anyhow::bail!(
                    "currency server unavailable after {} attempts: {}",
                    attempt + 1,
                    err
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing when a collector is configured
    let otel = if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        Some(init_tracer()?)
    } else {
        None
    };
    let (otel_tracer, otel_provider) = otel.unzip();
    let telemetry = otel_tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cars_app=debug,cars_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting cars server on port {}", config.port);
    tracing::info!(
        base = %config.base_currency,
        push_interval = ?config.rate_push_interval,
        fluctuation = config.rate_fluctuation_percent,
        "Using simulated currency server"
    );

    let rate_client = SimulatedRateClient::new(
        RateTable::fluctuating(config.rate_fluctuation_percent),
        config.rate_push_interval,
    );
    wait_for_rate_service(&rate_client, config.rate_healthcheck_retries).await?;

    // Create the car service
    let service = CarService::new(
        InMemoryCarStore::seeded(),
        rate_client,
        config.base_currency,
    );

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
