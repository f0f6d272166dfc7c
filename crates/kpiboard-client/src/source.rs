//! KPI source abstraction.
//!
//! The dashboard talks to a [`KpiSource`] rather than to [`KpiClient`]
//! directly, which lets controller tests script the backend's behavior.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::{BoxFuture, FutureExt};
use kpiboard_core::{KpiQuery, KpiSnapshot};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::client::KpiClient;
use crate::error::{ClientError, ClientResult};

/// Something that can produce a KPI snapshot.
pub trait KpiSource: Send + Sync {
    /// Fetch one snapshot. Single attempt, no retry.
    fn fetch_kpis<'a>(&'a self, query: &'a KpiQuery) -> BoxFuture<'a, ClientResult<KpiSnapshot>>;
}

impl KpiSource for KpiClient {
    fn fetch_kpis<'a>(&'a self, query: &'a KpiQuery) -> BoxFuture<'a, ClientResult<KpiSnapshot>> {
        KpiClient::fetch_kpis(self, query).boxed()
    }
}

/// Scripted response for [`MockKpiSource`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Resolve with this snapshot.
    Snapshot(KpiSnapshot),
    /// Fail as if the backend returned this status.
    Status { status: u16, body: String },
    /// Never resolve.
    Pending,
}

/// Mock KPI source for testing.
#[derive(Debug)]
pub struct MockKpiSource {
    /// What the next fetch returns.
    response: Mutex<MockResponse>,
    /// Optional gate held until the test releases it.
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Queries seen, in call order.
    queries: Mutex<Vec<KpiQuery>>,
    /// Number of fetches started.
    calls: AtomicUsize,
}

impl MockKpiSource {
    /// Create a mock that answers with `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response: Mutex::new(response),
            gate: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that resolves with `snapshot`.
    pub fn succeeding(snapshot: KpiSnapshot) -> Self {
        Self::new(MockResponse::Snapshot(snapshot))
    }

    /// Mock that fails with HTTP `status`.
    pub fn failing(status: u16) -> Self {
        Self::new(MockResponse::Status {
            status,
            body: String::new(),
        })
    }

    /// Mock whose fetch never completes.
    pub fn pending() -> Self {
        Self::new(MockResponse::Pending)
    }

    /// Hold the next fetch until the returned sender fires (or is dropped).
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock() = Some(rx);
        tx
    }

    /// Replace the scripted response.
    pub fn set_response(&self, response: MockResponse) {
        *self.response.lock() = response;
    }

    /// Number of fetches started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<KpiQuery> {
        self.queries.lock().clone()
    }
}

impl KpiSource for MockKpiSource {
    fn fetch_kpis<'a>(&'a self, query: &'a KpiQuery) -> BoxFuture<'a, ClientResult<KpiSnapshot>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        let gate = self.gate.lock().take();
        let response = self.response.lock().clone();

        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            match response {
                MockResponse::Snapshot(snapshot) => Ok(snapshot),
                MockResponse::Status { status, body } => Err(ClientError::Status { status, body }),
                MockResponse::Pending => futures_util::future::pending().await,
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> KpiSnapshot {
        KpiSnapshot::from_numbers(dec!(1000), 10, 50, dec!(200), dec!(0.2))
    }

    #[tokio::test]
    async fn test_mock_success_records_call() {
        let mock = MockKpiSource::succeeding(sample());
        let query = KpiQuery {
            region: Some("NA".to_string()),
            ..Default::default()
        };

        let snapshot = mock.fetch_kpis(&query).await.unwrap();
        assert_eq!(snapshot, sample());
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.queries(), vec![query]);
    }

    #[tokio::test]
    async fn test_mock_failure_is_network_error() {
        let mock = MockKpiSource::failing(503);
        let err = mock.fetch_kpis(&KpiQuery::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Network Error");
        assert!(err.detail().contains("503"));
    }

    #[tokio::test]
    async fn test_hold_delays_until_released() {
        let mock = MockKpiSource::succeeding(sample());
        let release = mock.hold();
        let query = KpiQuery::default();

        let mut fut = tokio_test::task::spawn(mock.fetch_kpis(&query));
        tokio_test::assert_pending!(fut.poll());

        release.send(()).unwrap();
        assert!(fut.is_woken());
        tokio_test::assert_ready_ok!(fut.poll());
    }
}
