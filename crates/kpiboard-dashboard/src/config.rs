//! Dashboard configuration.

use serde::{Deserialize, Serialize};

/// Page server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long a page request waits for its KPI fetch before rendering the
    /// loading view.
    #[serde(default = "default_page_wait_ms")]
    pub page_wait_ms: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_page_wait_ms() -> u64 {
    5_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            page_wait_ms: default_page_wait_ms(),
        }
    }
}
