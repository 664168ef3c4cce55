//! Prometheus metrics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use ledger::InventoryLedger;
use metrics_exporter_prometheus::PrometheusHandle;

/// State for the metrics router.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub ledger: Arc<InventoryLedger>,
}

/// GET /metrics — refreshes ledger gauges and returns Prometheus-formatted metrics.
pub async fn get(State(state): State<MetricsState>) -> impl IntoResponse {
    for flight_id in state.ledger.flight_ids() {
        let quote = state.ledger.quote_availability(&flight_id);
        metrics::gauge!("inventory_available_seats", "flight" => flight_id.to_string())
            .set(f64::from(quote.available_seats));
    }
    metrics::gauge!("inventory_active_holds").set(state.ledger.active_hold_count() as f64);

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.handle.render(),
    )
}
