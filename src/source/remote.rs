use async_trait::async_trait;
use futures_util::future::try_join3;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use super::DataSource;
use crate::campaigns::QueryParams;
use crate::date_range::{self, DateRange};
use crate::error::FetchError;
use crate::models::{
    CampaignPage, ChartData, ChartResponse, Metrics, RevenuePoint, TrafficSourcePoint,
    UserGrowthPoint,
};

/// Talks to the analytics API (`/metrics`, `/charts/*`, `/campaigns`).
pub struct RemoteSource {
    client: Client,
    base_url: Url,
}

impl RemoteSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    #[instrument(skip(self, query))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);
        debug!("API Request: GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("API Request Error: {} {}", url, e);
                FetchError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("API Response Error: {} {}", status, url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        debug!("API Response: {} {}", status, url);
        Ok(response.json::<T>().await?)
    }

    async fn fetch_chart<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let response: ChartResponse<T> = self.get_json(path, &[]).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn id(&self) -> &'static str {
        "remote"
    }

    async fn fetch_metrics(&self, range: Option<DateRange>) -> Result<Metrics, FetchError> {
        let query = date_range::query_pairs(range.as_ref());
        self.get_json("metrics", &query).await
    }

    /// The three chart endpoints are requested together; any failure fails
    /// the whole chart resource.
    async fn fetch_charts(&self) -> Result<ChartData, FetchError> {
        let (revenue, user_growth, traffic_sources) = try_join3(
            self.fetch_chart::<RevenuePoint>("charts/revenue"),
            self.fetch_chart::<UserGrowthPoint>("charts/user-growth"),
            self.fetch_chart::<TrafficSourcePoint>("charts/traffic-sources"),
        )
        .await?;

        Ok(ChartData {
            revenue,
            user_growth,
            traffic_sources,
        })
    }

    async fn fetch_campaigns(&self, params: &QueryParams) -> Result<CampaignPage, FetchError> {
        self.get_json("campaigns", &params.query_pairs()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slashes() {
        let source =
            RemoteSource::new("http://localhost:8001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint("metrics"), "http://localhost:8001/api/metrics");

        let source =
            RemoteSource::new("http://localhost:8001/api", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.endpoint("charts/revenue"),
            "http://localhost:8001/api/charts/revenue"
        );
    }

    #[test]
    fn rejects_malformed_base_url() {
        assert!(matches!(
            RemoteSource::new("not a url", Duration::from_secs(1)),
            Err(FetchError::Url(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_fetch_error() {
        let source =
            RemoteSource::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        let result = source.fetch_charts().await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
