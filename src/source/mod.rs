use async_trait::async_trait;

use crate::campaigns::QueryParams;
use crate::date_range::DateRange;
use crate::error::FetchError;
use crate::models::{CampaignPage, ChartData, Metrics};

pub mod mock;
pub mod remote;

pub use mock::MockSource;
pub use remote::RemoteSource;

/// Where the dashboard gets its data from: the bundled mock data set or the
/// analytics API.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn id(&self) -> &'static str;

    async fn fetch_metrics(&self, range: Option<DateRange>) -> Result<Metrics, FetchError>;

    async fn fetch_charts(&self) -> Result<ChartData, FetchError>;

    async fn fetch_campaigns(&self, params: &QueryParams) -> Result<CampaignPage, FetchError>;
}
