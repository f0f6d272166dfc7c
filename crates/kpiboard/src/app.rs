//! Main application orchestration.
//!
//! Two modes share one KPI source:
//! - one-shot: mount a dashboard, print the loading view, then the settled view
//! - serve: the page server, one mount per request

use std::io::Write;
use std::sync::Arc;

use kpiboard_client::{KpiClient, KpiSource};
use kpiboard_core::{KpiQuery, NumberFormatter};
use kpiboard_dashboard::{run_server, AppState, DashboardController, LoadState};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Main application.
pub struct Application {
    config: AppConfig,
    source: Arc<dyn KpiSource>,
    formatter: NumberFormatter,
}

impl Application {
    /// Create the application with an HTTP client for `config.api`.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = KpiClient::new(&config.api)?;
        info!(endpoint = %client.endpoint(), "KPI client ready");
        Self::with_source(config, Arc::new(client))
    }

    /// Create the application around an existing KPI source.
    pub fn with_source(config: AppConfig, source: Arc<dyn KpiSource>) -> AppResult<Self> {
        let locale = config.resolve_locale()?;
        info!(locale = %locale, "Display locale resolved");

        Ok(Self {
            config,
            source,
            formatter: NumberFormatter::new(locale),
        })
    }

    /// Filters sent with each KPI request.
    pub fn query(&self) -> &KpiQuery {
        &self.config.query
    }

    /// Render one dashboard mount to `out` and return its terminal state.
    pub async fn run_once<W: Write>(&self, out: &mut W) -> AppResult<LoadState> {
        let mut controller = DashboardController::activate(
            self.source.clone(),
            self.config.query.clone(),
            self.formatter,
        );

        write!(out, "{}", controller.view().to_text())?;
        out.flush()?;

        let state = controller.settled().await;
        if let Some(message) = state.error() {
            warn!(error = message, "Dashboard rendered without KPIs");
        }

        writeln!(out)?;
        write!(out, "{}", controller.view().to_text())?;
        out.flush()?;
        Ok(state)
    }

    /// Serve dashboard pages until Ctrl-C.
    pub async fn serve(self) -> AppResult<()> {
        let state = AppState::new(
            self.source,
            self.config.query,
            self.formatter,
            self.config.dashboard,
        );

        run_server(state, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpiboard_client::MockKpiSource;
    use kpiboard_core::KpiSnapshot;
    use rust_decimal_macros::dec;

    fn config() -> AppConfig {
        AppConfig {
            locale: Some("en-US".to_string()),
            ..Default::default()
        }
    }

    fn sample() -> KpiSnapshot {
        KpiSnapshot::from_numbers(dec!(1234.5), 1_234_567, 50, dec!(200), dec!(0.2))
    }

    #[tokio::test]
    async fn test_run_once_prints_loading_then_cards() {
        let source = Arc::new(MockKpiSource::succeeding(sample()));
        let app = Application::with_source(config(), source.clone()).unwrap();

        let mut out = Vec::new();
        let state = app.run_once(&mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(state.snapshot().is_some());
        let loading = text.find("Loading KPIs…").expect("loading view printed");
        let revenue = text.find("$1,234.50").expect("revenue card printed");
        assert!(loading < revenue);
        assert!(text.contains("1,234,567"));
        assert!(text.contains("Profit margin 20.00%"));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_run_once_prints_error_without_cards() {
        let source = Arc::new(MockKpiSource::failing(500));
        let app = Application::with_source(config(), source).unwrap();

        let mut out = Vec::new();
        let state = app.run_once(&mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(state.error(), Some("Network Error"));
        assert!(text.contains("Error: Network Error"));
        assert!(!text.contains("Total Revenue"));
    }

    #[tokio::test]
    async fn test_configured_query_is_forwarded() {
        let mut config = config();
        config.query.region = Some("Japan".to_string());
        let source = Arc::new(MockKpiSource::succeeding(sample()));
        let app = Application::with_source(config, source.clone()).unwrap();

        app.run_once(&mut Vec::new()).await.unwrap();
        assert_eq!(source.queries(), vec![app.query().clone()]);
    }

    #[test]
    fn test_unknown_locale_rejected_at_startup() {
        let config = AppConfig {
            locale: Some("tlh".to_string()),
            ..Default::default()
        };
        let source = Arc::new(MockKpiSource::pending());
        assert!(Application::with_source(config, source).is_err());
    }
}
