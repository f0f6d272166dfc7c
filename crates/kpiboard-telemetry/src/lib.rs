//! Prometheus metrics and structured logging for kpiboard.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Prometheus counters for KPI fetch outcomes and rendered pages

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
