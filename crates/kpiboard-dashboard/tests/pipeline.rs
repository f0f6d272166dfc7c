//! End-to-end tests: real HTTP client against a local backend, through the
//! controller, to rendered output.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kpiboard_client::{ClientConfig, KpiClient};
use kpiboard_core::{KpiQuery, Locale, NumberFormatter};
use kpiboard_dashboard::{DashboardController, LoadState};
use serde_json::{json, Value};

async fn kpis() -> Json<Value> {
    Json(json!({
        "total_revenue": 1000,
        "total_orders": 10,
        "total_units_sold": 50,
        "gross_profit": 200,
        "profit_margin": 0.2
    }))
}

async fn slow_kpis() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    kpis().await
}

async fn unavailable() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn spawn_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/kpis", get(kpis))
        .route("/api/slow", get(slow_kpis))
        .route("/api/down", get(unavailable));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn activate(addr: SocketAddr, path: &str) -> DashboardController {
    let mut config = ClientConfig::with_base_url(format!("http://{addr}"));
    config.kpi_path = path.to_string();
    let client = KpiClient::new(&config).unwrap();
    DashboardController::activate(
        Arc::new(client),
        KpiQuery::default(),
        NumberFormatter::new(Locale::EN_US),
    )
}

#[tokio::test]
async fn test_loaded_pipeline_renders_four_cards() {
    let addr = spawn_backend().await;
    let mut controller = activate(addr, "/api/kpis");

    let state = controller.settled().await;
    assert!(matches!(state, LoadState::Loaded(_)));

    let view = controller.view();
    let values: Vec<_> = view.cards().iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, ["$1,000.00", "10", "50", "$200.00"]);
    assert_eq!(view.cards()[3].subtitle, "Profit margin 20.00%");

    let text = view.to_text();
    assert!(!text.contains("Loading KPIs"));
    assert!(!text.contains("Error:"));
}

#[tokio::test]
async fn test_backend_failure_renders_error_line() {
    let addr = spawn_backend().await;
    let mut controller = activate(addr, "/api/down");

    let state = controller.settled().await;
    let message = state.error().expect("expected failed state");
    assert!(!message.is_empty());

    let view = controller.view();
    assert!(!view.is_loading());
    assert!(view.cards().is_empty());
    assert!(view.to_text().contains("Error: Network Error"));
}

#[tokio::test]
async fn test_slow_backend_shows_loading_first() {
    let addr = spawn_backend().await;
    let mut controller = activate(addr, "/api/slow");

    assert!(controller.view().is_loading());
    assert!(controller.view().to_text().contains("Loading KPIs…"));

    let state = controller.settled().await;
    assert!(state.snapshot().is_some());
    assert!(!controller.view().is_loading());
}
