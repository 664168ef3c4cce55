//! Liveness and readiness probes.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::inventory::AppState;

/// Identity of the running service, reported by every probe.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub started_at: Instant,
}

impl ServiceInfo {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            name: "inventoryservice",
            version: env!("CARGO_PKG_VERSION"),
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<DependencyCheck>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCheck {
    pub name: &'static str,
    pub status: &'static str,
    pub latency_ms: u128,
    pub flights: usize,
    pub active_holds: usize,
}

fn report(info: &ServiceInfo, checks: Option<Vec<DependencyCheck>>) -> HealthResponse {
    HealthResponse {
        service: info.name,
        version: info.version,
        environment: info.environment.clone(),
        status: "UP",
        timestamp: Utc::now(),
        uptime_seconds: info.started_at.elapsed().as_secs_f64(),
        checks,
    }
}

fn store_check(state: &AppState) -> DependencyCheck {
    let started = Instant::now();
    let flights = state.ledger.flight_ids().len();
    let active_holds = state.ledger.active_hold_count();

    DependencyCheck {
        name: "in-memory-store",
        status: "UP",
        latency_ms: started.elapsed().as_millis(),
        flights,
        active_holds,
    }
}

/// GET /inventory/health/live — the process is up.
pub async fn live(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(report(&state.service, None))
}

/// GET /inventory/health/ready — the ledger answers queries.
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(report(&state.service, Some(vec![store_check(&state)])))
}

/// GET /inventory/health — combined status with dependency checks.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(report(&state.service, Some(vec![store_check(&state)])))
}
