use serde::Serialize;

use crate::models::{MetricSnapshot, Metrics};

pub mod campaign_summary_aggregator;
pub mod metrics_aggregator;

pub use campaign_summary_aggregator::CampaignTotals;
pub use metrics_aggregator::MetricsAggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kpi {
    Revenue,
    Users,
    Conversions,
    Growth,
}

impl Kpi {
    pub const ALL: [Kpi; 4] = [Kpi::Revenue, Kpi::Users, Kpi::Conversions, Kpi::Growth];

    pub fn label(&self) -> &'static str {
        match self {
            Kpi::Revenue => "Total Revenue",
            Kpi::Users => "Active Users",
            Kpi::Conversions => "Conversion Rate",
            Kpi::Growth => "Growth Rate",
        }
    }

    pub fn snapshot<'a>(&self, metrics: &'a Metrics) -> &'a MetricSnapshot {
        match self {
            Kpi::Revenue => &metrics.revenue,
            Kpi::Users => &metrics.users,
            Kpi::Conversions => &metrics.conversions,
            Kpi::Growth => &metrics.growth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressStatus {
    TargetReached,
    OnTrack,
    NeedsAttention,
}

impl ProgressStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressStatus::TargetReached => "Target Reached",
            ProgressStatus::OnTrack => "On Track",
            ProgressStatus::NeedsAttention => "Needs Attention",
        }
    }
}

/// Progress towards a KPI target. `Unavailable` when the target is zero or
/// negative, so no NaN or infinity ever reaches a card or an export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Progress {
    Available { percent: f64, status: ProgressStatus },
    Unavailable,
}

impl Progress {
    /// Unclamped percentage, used for classification.
    pub fn percent(&self) -> Option<f64> {
        match self {
            Progress::Available { percent, .. } => Some(*percent),
            Progress::Unavailable => None,
        }
    }

    /// Percentage clamped to `[0, 100]` for a progress bar.
    pub fn display_percent(&self) -> Option<f64> {
        self.percent().map(|p| p.clamp(0.0, 100.0))
    }

    pub fn status(&self) -> Option<ProgressStatus> {
        match self {
            Progress::Available { status, .. } => Some(*status),
            Progress::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub kpi: Kpi,
    pub current: f64,
    pub previous: f64,
    pub change: Option<f64>,
    pub target: f64,
    pub progress: Progress,
}
