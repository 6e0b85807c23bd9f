//! Read-only projections of the dashboard into downloadable files.

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::date_range::format_api_date;
use crate::error::{ExportError, QueryError};
use crate::models::{CampaignPage, ChartData, Metrics};

mod report;
mod table;

pub use report::{DashboardReport, ReportSummary};

/// Written wherever a derived figure has no meaningful value.
pub const UNAVAILABLE: &str = "unavailable";

/// Borrowed view of what the dashboard currently has loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardSnapshot<'a> {
    pub metrics: Option<&'a Metrics>,
    pub charts: Option<&'a ChartData>,
    pub campaigns: Option<&'a CampaignPage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Metrics,
    Charts,
    Campaigns,
    Report,
}

impl FromStr for ExportKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metrics" => Ok(ExportKind::Metrics),
            "charts" => Ok(ExportKind::Charts),
            "campaigns" => Ok(ExportKind::Campaigns),
            "report" => Ok(ExportKind::Report),
            other => Err(QueryError::UnknownExport(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ExportArtifact {
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.body).await?;
        info!(path = %path.display(), bytes = self.body.len(), "Export written");
        Ok(path)
    }
}

/// Builds export files stamped with `report_date`.
pub struct ExportEngine {
    report_date: NaiveDate,
}

impl ExportEngine {
    pub fn new(report_date: NaiveDate) -> Self {
        Self { report_date }
    }

    pub fn today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    pub fn export(
        &self,
        kind: ExportKind,
        snapshot: &DashboardSnapshot<'_>,
    ) -> Result<ExportArtifact, ExportError> {
        match kind {
            ExportKind::Metrics => self.metrics_csv(snapshot.metrics),
            ExportKind::Charts => self.charts_csv(snapshot.charts),
            ExportKind::Campaigns => self.campaigns_csv(snapshot.campaigns),
            ExportKind::Report => self.dashboard_report(snapshot),
        }
    }

    pub fn metrics_csv(&self, metrics: Option<&Metrics>) -> Result<ExportArtifact, ExportError> {
        let metrics = metrics.ok_or(ExportError::Unavailable("metrics"))?;
        Ok(self.csv_artifact("metrics", table::metrics_table(metrics)?))
    }

    pub fn charts_csv(&self, charts: Option<&ChartData>) -> Result<ExportArtifact, ExportError> {
        let charts = charts.ok_or(ExportError::Unavailable("chart data"))?;
        if charts.is_empty() {
            return Err(ExportError::Empty("chart data"));
        }
        Ok(self.csv_artifact("charts", table::charts_table(charts)?))
    }

    pub fn campaigns_csv(
        &self,
        page: Option<&CampaignPage>,
    ) -> Result<ExportArtifact, ExportError> {
        let page = page.ok_or(ExportError::Unavailable("campaigns"))?;
        if page.campaigns.is_empty() {
            return Err(ExportError::Empty("campaigns"));
        }
        Ok(self.csv_artifact("campaigns", table::campaigns_table(&page.campaigns)?))
    }

    pub fn dashboard_report(
        &self,
        snapshot: &DashboardSnapshot<'_>,
    ) -> Result<ExportArtifact, ExportError> {
        let metrics = snapshot.metrics.ok_or(ExportError::Unavailable("metrics"))?;
        let charts = snapshot.charts.ok_or(ExportError::Unavailable("chart data"))?;
        let page = snapshot.campaigns.ok_or(ExportError::Unavailable("campaigns"))?;

        let report = DashboardReport::new(self.report_date, metrics, charts, &page.campaigns);
        Ok(ExportArtifact {
            filename: format!("dashboard_report_{}.json", self.date_stamp()),
            content_type: "application/json",
            body: serde_json::to_vec_pretty(&report)?,
        })
    }

    fn date_stamp(&self) -> String {
        format_api_date(self.report_date)
    }

    fn csv_artifact(&self, prefix: &str, body: Vec<u8>) -> ExportArtifact {
        ExportArtifact {
            filename: format!("{}_{}.csv", prefix, self.date_stamp()),
            content_type: "text/csv;charset=utf-8",
            body,
        }
    }
}
