//! kpiboard-dashboard - KPI fetch-and-render pipeline.
//!
//! This crate turns one KPI fetch into a dashboard view. It includes:
//!
//! - `DashboardController`: one fetch per activation, tracked as a `LoadState`
//! - `DashboardView`: four formatted KPI cards, or a loading / error line
//! - An axum page server where each request is one activation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      kpiboard process                        │
//! │                                                              │
//! │  ┌──────────────────────┐   spawn    ┌────────────────────┐  │
//! │  │ DashboardController  │──────────▶│  fetch task         │  │
//! │  │  watch::Receiver     │◀──────────│  KpiSource (HTTP)   │  │
//! │  └──────────┬───────────┘  LoadState └────────────────────┘  │
//! │             │                                                │
//! │             ▼                                                │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │ DashboardView (NumberFormatter per card value)        │    │
//! │  └──────────┬─────────────────────────────┬─────────────┘    │
//! │             ▼                             ▼                  │
//! │        to_text() (terminal)     axum server (port 8080)      │
//! │                                 GET /          → HTML page   │
//! │                                 GET /api/view  → JSON view   │
//! │                                 GET /health, GET /metrics    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use kpiboard_dashboard::DashboardController;
//!
//! let mut controller = DashboardController::activate(source, query, formatter);
//! print!("{}", controller.view().to_text()); // loading view
//! controller.settled().await;
//! print!("{}", controller.view().to_text()); // cards or error
//! ```

mod config;
mod controller;
mod error;
mod server;
mod state;
mod view;

pub use config::DashboardConfig;
pub use controller::DashboardController;
pub use error::{DashboardError, DashboardResult};
pub use server::{create_router, run_server, AppState};
pub use state::{LoadState, FETCH_FAILED_FALLBACK};
pub use view::{
    kpi_cards, DashboardView, KpiCard, ViewBody, DASHBOARD_TAGLINE, DASHBOARD_TITLE,
    LOADING_MESSAGE,
};
