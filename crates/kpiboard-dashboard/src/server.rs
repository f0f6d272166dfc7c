//! HTTP page server implementation using axum.
//!
//! Each page request is one dashboard mount: it activates a controller,
//! waits a bounded time for the fetch to settle, renders, and drops the
//! controller. A fetch still outstanding at render time is cancelled.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use kpiboard_client::KpiSource;
use kpiboard_core::{KpiQuery, NumberFormatter};
use kpiboard_telemetry::Metrics;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::controller::DashboardController;
use crate::error::{DashboardError, DashboardResult};
use crate::view::DashboardView;

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn KpiSource>,
    query: KpiQuery,
    formatter: NumberFormatter,
    config: DashboardConfig,
}

impl AppState {
    pub fn new(
        source: Arc<dyn KpiSource>,
        query: KpiQuery,
        formatter: NumberFormatter,
        config: DashboardConfig,
    ) -> Self {
        Self {
            source,
            query,
            formatter,
            config,
        }
    }

    /// Mount a dashboard, wait for it to settle (bounded), and render.
    async fn mount_view(&self) -> DashboardView {
        let mut controller =
            DashboardController::activate(self.source.clone(), self.query.clone(), self.formatter);

        let wait = Duration::from_millis(self.config.page_wait_ms);
        if tokio::time::timeout(wait, controller.settled()).await.is_err() {
            warn!(wait_ms = self.config.page_wait_ms, "KPI fetch still pending, serving loading view");
        }

        let view = controller.view();
        Metrics::page_rendered(view.state_label());
        debug!(state = view.state_label(), "Dashboard rendered");
        view
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/view", get(get_view))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Serve the dashboard page.
async fn serve_index(State(state): State<AppState>) -> Html<String> {
    Html(state.mount_view().await.to_html())
}

/// Current dashboard view as JSON.
async fn get_view(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.mount_view().await)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Prometheus text exposition.
async fn metrics() -> Response {
    match Metrics::encode_text() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Run the dashboard HTTP server until `shutdown` resolves.
pub async fn run_server(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> DashboardResult<()> {
    let port = state.config.port;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| DashboardError::Bind { port, source })?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(DashboardError::Serve)?;

    info!("Dashboard server stopped");
    Ok(())
}
