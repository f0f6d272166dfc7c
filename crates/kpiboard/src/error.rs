//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] kpiboard_client::ClientError),

    #[error("Invalid input: {0}")]
    Core(#[from] kpiboard_core::CoreError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] kpiboard_dashboard::DashboardError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] kpiboard_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
