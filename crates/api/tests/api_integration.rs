//! Integration tests for the API server.

use std::sync::Arc;
use std::sync::OnceLock;

use api::config::Config;
use api::routes::inventory::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use ledger::{InventoryLedger, ManualClock, StaticCapacity, UnknownFlightPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_state(&Config::default());
    api::create_app(state, get_metrics_handle())
}

fn setup_with_clock() -> (axum::Router, Arc<AppState>, ManualClock) {
    let clock = ManualClock::starting_now();
    let ledger = InventoryLedger::builder()
        .clock(clock.clone())
        .capacity_source(&StaticCapacity::demo())
        .build();
    let state = api::create_state_with_ledger(ledger, &Config::default());
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state, clock)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn seats(app: &axum::Router, flight_id: &str) -> u64 {
    let (status, json) = send(app, get(&format!("/inventory/flights/{flight_id}/seats"))).await;
    assert_eq!(status, StatusCode::OK);
    json["availableSeats"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health_probes() {
    let app = setup();

    for uri in [
        "/inventory/health",
        "/inventory/health/live",
        "/inventory/health/ready",
    ] {
        let (status, json) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(json["status"], "UP");
        assert_eq!(json["service"], "inventoryservice");
        assert_eq!(json["environment"], "Development");
        assert!(json["uptimeSeconds"].as_f64().is_some());
    }

    let (_, ready) = send(&app, get("/inventory/health/ready")).await;
    assert_eq!(ready["checks"][0]["name"], "in-memory-store");
    assert_eq!(ready["checks"][0]["flights"], 3);

    let (_, live) = send(&app, get("/inventory/health/live")).await;
    assert!(live.get("checks").is_none());
}

#[tokio::test]
async fn test_quote_seeded_and_unknown_flights() {
    let app = setup();

    let (status, json) = send(&app, get("/inventory/flights/AI202/seats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["flightId"], "AI202");
    assert_eq!(json["availableSeats"], 14);
    assert_eq!(json["status"], "AVAILABLE");

    let (status, json) = send(&app, get("/inventory/flights/zz000/seats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["flightId"], "ZZ000");
    assert_eq!(json["availableSeats"], 0);
    assert_eq!(json["status"], "SOLD_OUT");
}

#[tokio::test]
async fn test_hold_confirm_release_lifecycle() {
    let app = setup();

    let (status, hold) = send(
        &app,
        post_json(
            "/inventory/hold",
            serde_json::json!({ "flightId": "AI202", "seatCount": 5, "ttlSeconds": 600, "cabin": "ECONOMY" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hold["status"], "HELD");
    assert_eq!(hold["flightId"], "AI202");
    assert!(hold["expiresAt"].as_str().is_some());
    let hold_id = hold["holdId"].as_str().unwrap().to_string();
    assert!(hold_id.starts_with("hold_"));
    assert_eq!(seats(&app, "AI202").await, 9);

    let (status, confirmed) = send(
        &app,
        post_json(
            "/inventory/confirm-hold",
            serde_json::json!({ "holdId": hold_id.to_uppercase() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");
    assert_eq!(confirmed["holdId"], hold_id.as_str());
    assert_eq!(seats(&app, "AI202").await, 9);

    let (status, again) = send(
        &app,
        post_json(
            "/inventory/confirm-hold",
            serde_json::json!({ "holdId": hold_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["reason"], "ALREADY_CONFIRMED");

    let (status, released) = send(
        &app,
        post_json("/inventory/release", serde_json::json!({ "holdId": hold_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(released["status"], "RELEASED");
    assert_eq!(seats(&app, "AI202").await, 14);

    let (status, missing) = send(
        &app,
        post_json("/inventory/release", serde_json::json!({ "holdId": hold_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["reason"], "HOLD_NOT_FOUND");
    assert_eq!(missing["holdId"], hold_id.as_str());

    let (status, missing) = send(
        &app,
        post_json(
            "/inventory/confirm-hold",
            serde_json::json!({ "holdId": hold_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["reason"], "HOLD_NOT_FOUND");
    assert_eq!(missing["holdId"], hold_id.as_str());
}

#[tokio::test]
async fn test_sold_out_flight_returns_conflict() {
    let app = setup();

    let (status, _) = send(
        &app,
        post_json(
            "/inventory/hold",
            serde_json::json!({ "flightId": "6E310", "seatCount": 10 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seats(&app, "6E310").await, 0);

    let (status, json) = send(
        &app,
        post_json(
            "/inventory/hold",
            serde_json::json!({ "flightId": "6E310", "seatCount": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["reason"], "INSUFFICIENT_SEATS");
    assert_eq!(json["status"], "REJECTED");
    assert_eq!(json["flightId"], "6E310");
    assert_eq!(seats(&app, "6E310").await, 0);
}

#[tokio::test]
async fn test_invalid_seat_count_returns_bad_request() {
    let app = setup();

    for count in [0, -2] {
        let (status, json) = send(
            &app,
            post_json(
                "/inventory/hold",
                serde_json::json!({ "flightId": "AI202", "seatCount": count }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["reason"], "INVALID_SEAT_COUNT");
    }
    assert_eq!(seats(&app, "AI202").await, 14);
}

#[tokio::test]
async fn test_malformed_body_returns_bad_request() {
    let app = setup();

    let (status, json) = send(
        &app,
        post_json("/inventory/hold", serde_json::json!({ "flightId": "AI202" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["reason"], "BAD_REQUEST");

    let request = Request::builder()
        .method("POST")
        .uri("/inventory/confirm-hold")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_hold_confirm_returns_conflict() {
    let (app, state, clock) = setup_with_clock();

    let (_, hold) = send(
        &app,
        post_json(
            "/inventory/hold",
            serde_json::json!({ "flightId": "UK811", "seatCount": 3, "ttlSeconds": 1 }),
        ),
    )
    .await;
    let hold_id = hold["holdId"].as_str().unwrap().to_string();
    assert_eq!(seats(&app, "UK811").await, 5);

    clock.advance_secs(2);

    let (status, json) = send(
        &app,
        post_json(
            "/inventory/confirm-hold",
            serde_json::json!({ "holdId": hold_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], "EXPIRED");
    assert_eq!(json["holdId"], hold_id.as_str());
    assert_eq!(seats(&app, "UK811").await, 8);
    assert_eq!(state.ledger.active_hold_count(), 0);
}

#[tokio::test]
async fn test_unknown_flight_reject_policy_returns_not_found() {
    let config = Config {
        unknown_flight: UnknownFlightPolicy::Reject,
        ..Config::default()
    };
    let app = api::create_app(api::create_state(&config), get_metrics_handle());

    let (status, json) = send(
        &app,
        post_json(
            "/inventory/hold",
            serde_json::json!({ "flightId": "ZZ000", "seatCount": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["reason"], "FLIGHT_NOT_FOUND");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    send(
        &app,
        post_json(
            "/inventory/hold",
            serde_json::json!({ "flightId": "AI202", "seatCount": 1 }),
        ),
    )
    .await;

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("inventory_available_seats"));
}
