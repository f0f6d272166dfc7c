//! One-shot KPI fetch bound to a dashboard view's lifetime.
//!
//! Activating a controller spawns exactly one fetch task. The task reports
//! its result through a watch channel; the controller owns the receiving
//! side. Dropping the controller aborts the task, and a result that arrives
//! after the receiver is gone is discarded.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use kpiboard_client::KpiSource;
use kpiboard_core::{KpiQuery, NumberFormatter};
use kpiboard_telemetry::Metrics;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::state::LoadState;
use crate::view::DashboardView;

/// Dashboard controller for a single activation.
pub struct DashboardController {
    /// Current view state, written once by the fetch task.
    state_rx: watch::Receiver<LoadState>,
    /// The fetch task.
    task: JoinHandle<()>,
    /// Formatter used to build views.
    formatter: NumberFormatter,
}

impl DashboardController {
    /// Enter `Loading` and start the one fetch for this activation.
    ///
    /// Must be called within a tokio runtime.
    pub fn activate(
        source: Arc<dyn KpiSource>,
        query: KpiQuery,
        formatter: NumberFormatter,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(LoadState::Loading);
        let task = tokio::spawn(run_fetch(source, query, state_tx));

        Self {
            state_rx,
            task,
            formatter,
        }
    }

    /// Current state.
    pub fn state(&self) -> LoadState {
        self.state_rx.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state_rx.borrow().is_loading()
    }

    /// Wait until the fetch has resolved and return the terminal state.
    ///
    /// Never returns `Loading`: if the task ends without reporting, the
    /// generic failure is returned.
    pub async fn settled(&mut self) -> LoadState {
        match self.state_rx.wait_for(|s| !s.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => LoadState::failed(""),
        }
    }

    /// Receiver for observing state changes.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_rx.clone()
    }

    /// View of the current state.
    pub fn view(&self) -> DashboardView {
        DashboardView::from_state(&self.state_rx.borrow(), &self.formatter)
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            debug!("Dashboard torn down with fetch outstanding, cancelling");
        }
        self.task.abort();
    }
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("state", &self.state_rx.borrow().label())
            .field("locale", &self.formatter.locale().tag())
            .finish()
    }
}

/// Fetch once and publish the outcome.
async fn run_fetch(
    source: Arc<dyn KpiSource>,
    query: KpiQuery,
    state_tx: watch::Sender<LoadState>,
) {
    let started = Instant::now();
    let result = AssertUnwindSafe(source.fetch_kpis(&query))
        .catch_unwind()
        .await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let next = match result {
        Ok(Ok(snapshot)) => {
            info!(elapsed_ms, "KPIs loaded");
            Metrics::fetch_ok(elapsed_ms);
            LoadState::Loaded(snapshot)
        }
        Ok(Err(e)) => {
            error!(error = %e.detail(), elapsed_ms, "API error");
            Metrics::fetch_failed(elapsed_ms);
            LoadState::failed(e.user_message())
        }
        Err(_) => {
            error!(elapsed_ms, "KPI fetch panicked");
            Metrics::fetch_failed(elapsed_ms);
            LoadState::failed("")
        }
    };

    if state_tx.send(next).is_err() {
        debug!("Dashboard gone before fetch resolved, result discarded");
        Metrics::fetch_discarded();
    }
}
