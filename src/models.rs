use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 3] = [
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Paused => "Paused",
            CampaignStatus::Completed => "Completed",
        }
    }

    /// Case-insensitive lookup, so `active`, `Active` and `ACTIVE` all match.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the campaign table. Dates stay as the `YYYY-MM-DD` strings the
/// data source hands out; they are parsed only when a date filter needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "campaign_name", alias = "campaign")]
    pub name: String,
    pub status: CampaignStatus,
    pub budget: f64,
    pub spent: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub cpa: f64,
    pub roas: f64,
    #[serde(alias = "startDate")]
    pub start_date: String,
    #[serde(alias = "endDate")]
    pub end_date: String,
}

/// Ids arrive as strings from the API and as numbers in the mock records.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub current: f64,
    pub previous: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub revenue: MetricSnapshot,
    pub users: MetricSnapshot,
    pub conversions: MetricSnapshot,
    pub growth: MetricSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub current: f64,
    pub previous: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGrowthPoint {
    pub month: String,
    pub users: u64,
    #[serde(rename = "newUsers")]
    pub new_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSourcePoint {
    pub name: String,
    pub value: u64,
    pub color: String,
}

/// Envelope used by every `/api/charts/*` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub revenue: Vec<RevenuePoint>,
    #[serde(rename = "userGrowth")]
    pub user_growth: Vec<UserGrowthPoint>,
    #[serde(rename = "trafficSources")]
    pub traffic_sources: Vec<TrafficSourcePoint>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.revenue.is_empty() && self.user_growth.is_empty() && self.traffic_sources.is_empty()
    }
}

/// One page of the campaign table plus the count before pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPage {
    pub campaigns: Vec<Campaign>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

impl CampaignPage {
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as usize) as u32
    }

    /// 1-based `(first, last)` row numbers shown on this page, `None` when the
    /// page is empty.
    pub fn showing(&self) -> Option<(usize, usize)> {
        if self.campaigns.is_empty() {
            return None;
        }
        let first = (self.page.max(1) as usize - 1) * self.per_page as usize + 1;
        Some((first, first + self.campaigns.len() - 1))
    }
}
