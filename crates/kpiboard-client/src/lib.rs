//! HTTP client for the retail analytics KPI endpoint.
//!
//! The base URL is an explicit [`ClientConfig`] value injected at
//! construction. All fetch failures display as one user-safe message while
//! keeping their cause for diagnostics.

pub mod client;
pub mod config;
pub mod error;
pub mod source;

pub use client::KpiClient;
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult, NETWORK_ERROR};
pub use source::{KpiSource, MockKpiSource, MockResponse};
