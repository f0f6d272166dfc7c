//! Application configuration.

use std::path::Path;

use kpiboard_client::ClientConfig;
use kpiboard_core::{KpiQuery, Locale};
use kpiboard_dashboard::DashboardConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "KPIBOARD_CONFIG";

/// Configuration file used when neither `--config` nor `KPIBOARD_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// KPI backend endpoint.
    #[serde(default)]
    pub api: ClientConfig,
    /// Display locale tag (e.g. `de-DE`). Unset means the process locale.
    #[serde(default)]
    pub locale: Option<String>,
    /// Page server settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Default filters sent with every KPI request.
    #[serde(default)]
    pub query: KpiQuery,
}

impl AppConfig {
    /// Load configuration: explicit path > `KPIBOARD_CONFIG` > default path.
    ///
    /// A missing file yields defaults.
    pub fn load(explicit: Option<&str>) -> AppResult<Self> {
        let config_path = explicit
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            tracing::info!(path = %config_path, "Loading configuration");
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Display locale: configured tag, or the process locale when unset.
    pub fn resolve_locale(&self) -> AppResult<Locale> {
        match self.locale.as_deref() {
            Some(tag) if !tag.trim().is_empty() => Ok(Locale::parse(tag)?),
            _ => Ok(Locale::from_env()),
        }
    }
}
