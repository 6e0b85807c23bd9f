use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::DataSource;
use crate::campaigns::{self, QueryParams};
use crate::date_range::DateRange;
use crate::error::FetchError;
use crate::mock_data;
use crate::models::{Campaign, CampaignPage, ChartData, Metrics};

/// Serves the bundled data set, shaping campaign pages locally.
pub struct MockSource {
    metrics: Metrics,
    charts: ChartData,
    campaigns: Vec<Campaign>,
    latency: Duration,
}

impl MockSource {
    pub fn new() -> Self {
        Self::with_data(mock_data::metrics(), mock_data::chart_data(), mock_data::campaigns())
    }

    pub fn with_data(metrics: Metrics, charts: ChartData, campaigns: Vec<Campaign>) -> Self {
        Self {
            metrics,
            charts,
            campaigns,
            latency: Duration::ZERO,
        }
    }

    /// Delay every answer, the way a network round trip would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn id(&self) -> &'static str {
        "mock"
    }

    /// The mock KPIs are a fixed snapshot; the range is accepted and ignored.
    async fn fetch_metrics(&self, range: Option<DateRange>) -> Result<Metrics, FetchError> {
        self.simulate_latency().await;
        debug!(?range, "Serving mock metrics");
        Ok(self.metrics.clone())
    }

    async fn fetch_charts(&self) -> Result<ChartData, FetchError> {
        self.simulate_latency().await;
        Ok(self.charts.clone())
    }

    async fn fetch_campaigns(&self, params: &QueryParams) -> Result<CampaignPage, FetchError> {
        self.simulate_latency().await;
        Ok(campaigns::transform(&self.campaigns, params))
    }
}
