//! Dashboard error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Failed to bind dashboard port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Dashboard server failed: {0}")]
    Serve(#[source] std::io::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
