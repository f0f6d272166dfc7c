//! HTTP client for the KPI endpoint.
//!
//! One GET per call, no retry. Failures of any kind surface to callers as
//! the same user-safe [`ClientError`] text; the cause is logged here and kept
//! on the error for the caller's own logs.

use std::time::Duration;

use kpiboard_core::{KpiQuery, KpiSnapshot};
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Client for the analytics backend's KPI endpoint.
#[derive(Debug, Clone)]
pub struct KpiClient {
    /// HTTP client.
    client: Client,
    /// Fully joined endpoint URL.
    endpoint: Url,
}

impl KpiClient {
    /// Create a new KPI client.
    ///
    /// The base URL must already be resolved (see
    /// [`ClientConfig::resolve_base_url`]).
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let raw = config.endpoint_url();
        let endpoint = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().map_err(ClientError::Build)?;

        debug!(endpoint = %endpoint, timeout_ms = ?config.timeout_ms, "KPI client created");

        Ok(Self { client, endpoint })
    }

    /// Endpoint this client targets.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the KPI snapshot.
    ///
    /// Filters in `query` are sent as query-string parameters; an empty
    /// query sends none.
    pub async fn fetch_kpis(&self, query: &KpiQuery) -> ClientResult<KpiSnapshot> {
        info!(url = %self.endpoint, filtered = !query.is_empty(), "Fetching KPIs");

        let mut request = self.client.get(self.endpoint.clone());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|source| {
            warn!(error = %source, "KPI request failed");
            ClientError::Transport { source }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "KPI endpoint returned an error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let snapshot: KpiSnapshot = response.json().await.map_err(|source| {
            warn!(error = %source, "Failed to parse KPI response");
            ClientError::Decode { source }
        })?;

        debug!(?snapshot, "KPI snapshot received");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_malformed_base_url() {
        let config = ClientConfig::with_base_url("not a url");
        let err = KpiClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_endpoint_is_joined_once() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9999/");
        let client = KpiClient::new(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9999/api/kpis");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) is closed on loopback in test environments.
        let mut config = ClientConfig::with_base_url("http://127.0.0.1:9");
        config.timeout_ms = Some(2_000);
        let client = KpiClient::new(&config).unwrap();

        let err = client.fetch_kpis(&KpiQuery::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Network Error");
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
