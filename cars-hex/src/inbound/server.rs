//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use cars_types::{CarStore, RateClient};

use super::handlers::{self, AppState};
use crate::CarService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Cars API.
pub struct HttpServer<S: CarStore, C: RateClient> {
    state: Arc<AppState<S, C>>,
}

impl<S: CarStore, C: RateClient> HttpServer<S, C> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: CarService<S, C>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/cars",
                get(handlers::list_cars::<S, C>)
                    .post(handlers::create_car::<S, C>)
                    .put(handlers::update_car::<S, C>),
            )
            .route(
                "/cars/{id}",
                get(handlers::get_car::<S, C>).delete(handlers::delete_car::<S, C>),
            )
            .route("/swagger.json", get(handlers::swagger_json))
            .merge(Redoc::with_url("/docs", ApiDoc::openapi()))
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    ///
    /// Once the listener has drained, the rate subscription reader is stopped.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.state.service.shutdown().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
