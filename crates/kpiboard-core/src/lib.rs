//! Core domain types for the retail KPI dashboard.
//!
//! - `KpiSnapshot`, `KpiValue`: the backend's KPI payload, parsed leniently
//! - `KpiQuery`: optional filters for the KPI endpoint
//! - `NumberFormatter`, `Locale`: locale-aware rendering of KPI values

pub mod error;
pub mod format;
pub mod snapshot;

pub use error::{CoreError, Result};
pub use format::{CurrencyPattern, Locale, NumberFormatter, PLACEHOLDER};
pub use snapshot::{KpiQuery, KpiSnapshot, KpiValue};
