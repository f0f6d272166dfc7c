//! KPI client configuration.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured API base URL.
pub const BASE_URL_ENV: &str = "KPIBOARD_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// KPI endpoint configuration.
///
/// Built once at startup and handed to [`crate::KpiClient::new`]; the client
/// never reads the environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and port of the analytics backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the KPI endpoint, joined onto `base_url`.
    #[serde(default = "default_kpi_path")]
    pub kpi_path: String,
    /// Per-request timeout in milliseconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_kpi_path() -> String {
    "/api/kpis".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            kpi_path: default_kpi_path(),
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with default path and no timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full KPI endpoint URL.
    ///
    /// Tolerates a trailing slash on the base and a missing leading slash on
    /// the path.
    pub fn endpoint_url(&self) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let path = self.kpi_path.trim();
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Resolve the base URL: explicit value > `KPIBOARD_API_URL` > configured
    /// value > [`DEFAULT_BASE_URL`].
    ///
    /// Reads the environment once; call at startup.
    pub fn resolve_base_url(explicit: Option<String>, configured: Option<String>) -> String {
        let from_env = std::env::var(BASE_URL_ENV).ok();
        pick_base_url(explicit, from_env, configured)
    }
}

fn pick_base_url(
    explicit: Option<String>,
    from_env: Option<String>,
    configured: Option<String>,
) -> String {
    [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(default_base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.kpi_path, "/api/kpis");
        assert_eq!(config.timeout_ms, None);
        assert_eq!(config.endpoint_url(), "http://127.0.0.1:5000/api/kpis");
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let mut config = ClientConfig::with_base_url("http://analytics.local:8000/");
        config.kpi_path = "api/data".to_string();
        assert_eq!(config.endpoint_url(), "http://analytics.local:8000/api/data");
    }

    #[test]
    fn test_base_url_precedence() {
        let explicit = Some("http://cli:1".to_string());
        let env = Some("http://env:2".to_string());
        let file = Some("http://file:3".to_string());

        assert_eq!(pick_base_url(explicit, env.clone(), file.clone()), "http://cli:1");
        assert_eq!(pick_base_url(None, env, file.clone()), "http://env:2");
        assert_eq!(pick_base_url(None, Some("  ".to_string()), file), "http://file:3");
        assert_eq!(pick_base_url(None, None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_ms": 2500}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, Some(2500));
    }
}
