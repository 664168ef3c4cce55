//! HTTP API for the seat inventory ledger.
//!
//! Exposes seat quotes and the hold lifecycle over REST, with health probes,
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod sweeper;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use ledger::InventoryLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::health::ServiceInfo;
use routes::inventory::AppState;
use routes::metrics::MetricsState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(MetricsState {
            handle: metrics_handle,
            ledger: Arc::clone(&state.ledger),
        });

    Router::new()
        .route("/inventory/health", get(routes::health::check))
        .route("/inventory/health/live", get(routes::health::live))
        .route("/inventory/health/ready", get(routes::health::ready))
        .route(
            "/inventory/flights/{flight_id}/seats",
            get(routes::inventory::seats),
        )
        .route("/inventory/hold", post(routes::inventory::hold))
        .route("/inventory/confirm-hold", post(routes::inventory::confirm))
        .route("/inventory/release", post(routes::inventory::release))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with a ledger seeded from `config`.
pub fn create_state(config: &Config) -> Arc<AppState> {
    let ledger = InventoryLedger::builder()
        .default_ttl_secs(config.default_ttl_secs)
        .unknown_flight(config.unknown_flight)
        .capacity_source(&config.seed)
        .build();

    create_state_with_ledger(ledger, config)
}

/// Creates the application state around an already built ledger.
pub fn create_state_with_ledger(ledger: InventoryLedger, config: &Config) -> Arc<AppState> {
    Arc::new(AppState {
        ledger: Arc::new(ledger),
        service: ServiceInfo::new(config.environment.clone()),
    })
}
