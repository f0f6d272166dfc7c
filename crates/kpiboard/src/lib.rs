//! Retail analytics KPI dashboard.
//!
//! Wires the pieces together:
//! - Configuration file and CLI overrides
//! - KPI client against the analytics backend
//! - One-shot terminal rendering, or the page server

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
