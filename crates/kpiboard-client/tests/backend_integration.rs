//! Integration tests against a local stand-in for the analytics backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kpiboard_client::{ClientConfig, ClientError, KpiClient};
use kpiboard_core::{KpiQuery, KpiValue};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn kpis(
    State(seen): State<SeenQueries>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().push(params);
    Json(json!({
        "total_revenue": 1000,
        "total_orders": 10,
        "total_units_sold": 50,
        "gross_profit": 200,
        "average_order_value": 100.0,
        "profit_margin": 0.2
    }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "KeyError: 'ORDERNUMBER'")
}

async fn not_an_object() -> &'static str {
    "<html>oops</html>"
}

async fn spawn_backend() -> (SocketAddr, SeenQueries) {
    let seen: SeenQueries = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/kpis", get(kpis))
        .route("/api/broken", get(broken))
        .route("/api/html", get(not_an_object))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn client_for(addr: SocketAddr, path: &str) -> KpiClient {
    let mut config = ClientConfig::with_base_url(format!("http://{addr}"));
    config.kpi_path = path.to_string();
    config.timeout_ms = Some(5_000);
    KpiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_kpis_parses_backend_payload() {
    let (addr, seen) = spawn_backend().await;
    let client = client_for(addr, "/api/kpis");

    let snapshot = client.fetch_kpis(&KpiQuery::default()).await.unwrap();
    assert_eq!(snapshot.total_revenue, Some(KpiValue::Number(dec!(1000))));
    assert_eq!(snapshot.total_units_sold, Some(KpiValue::Number(dec!(50))));
    assert_eq!(snapshot.profit_margin, Some(KpiValue::Number(dec!(0.2))));

    // Empty query sends no parameters.
    assert_eq!(seen.lock().unwrap().as_slice(), &[HashMap::new()]);
}

#[tokio::test]
async fn test_fetch_kpis_sends_filters() {
    let (addr, seen) = spawn_backend().await;
    let client = client_for(addr, "/api/kpis");
    let query = KpiQuery {
        start: Some(KpiQuery::parse_date("2004-01-01").unwrap()),
        end: Some(KpiQuery::parse_date("2004-12-31").unwrap()),
        region: Some("EMEA".to_string()),
        product_code: None,
    };

    client.fetch_kpis(&query).await.unwrap();

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params.get("start").map(String::as_str), Some("2004-01-01"));
    assert_eq!(params.get("end").map(String::as_str), Some("2004-12-31"));
    assert_eq!(params.get("region").map(String::as_str), Some("EMEA"));
    assert!(!params.contains_key("product_code"));
}

#[tokio::test]
async fn test_error_status_is_normalized() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr, "/api/broken");

    let err = client.fetch_kpis(&KpiQuery::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Network Error");
    match &err {
        ClientError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert!(body.contains("KeyError"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_route_is_normalized() {
    let (addr, _) = spawn_backend().await;
    // The legacy path is not served by this backend.
    let client = client_for(addr, "/api/data");

    let err = client.fetch_kpis(&KpiQuery::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Network Error");
    assert!(err.detail().contains("404"));
}

#[tokio::test]
async fn test_non_json_body_is_normalized() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr, "/api/html");

    let err = client.fetch_kpis(&KpiQuery::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Network Error");
    assert!(matches!(err, ClientError::Decode { .. }));
}
