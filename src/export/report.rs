use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregators::CampaignTotals;
use crate::date_range::format_api_date;
use crate::models::{Campaign, ChartData, Metrics};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_budget: f64,
    pub total_spent: f64,
    pub total_revenue: f64,
    #[serde(rename = "averageROAS")]
    pub average_roas: f64,
}

impl ReportSummary {
    /// Totals cover only the campaigns passed in, normally the visible page.
    pub fn new(metrics: &Metrics, campaigns: &[Campaign]) -> Self {
        let totals = CampaignTotals::from_campaigns(campaigns);
        Self {
            total_campaigns: totals.total_campaigns,
            active_campaigns: totals.active_campaigns,
            total_budget: totals.total_budget,
            total_spent: totals.total_spent,
            total_revenue: metrics.revenue.current,
            average_roas: totals.average_roas,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport<'a> {
    pub report_date: String,
    pub metrics: &'a Metrics,
    pub chart_data: &'a ChartData,
    pub campaigns: &'a [Campaign],
    pub summary: ReportSummary,
}

impl<'a> DashboardReport<'a> {
    pub fn new(
        report_date: NaiveDate,
        metrics: &'a Metrics,
        chart_data: &'a ChartData,
        campaigns: &'a [Campaign],
    ) -> Self {
        Self {
            report_date: format_api_date(report_date),
            metrics,
            chart_data,
            campaigns,
            summary: ReportSummary::new(metrics, campaigns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaigns::{self, QueryParams, SortDirection, SortField};
    use crate::mock_data;
    use serde_json::Value;

    fn report_json(campaigns: &[Campaign]) -> Value {
        let metrics = mock_data::metrics();
        let charts = mock_data::chart_data();
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        serde_json::to_value(DashboardReport::new(date, &metrics, &charts, campaigns)).unwrap()
    }

    #[test]
    fn summary_covers_the_current_page() {
        let mut params = QueryParams::default();
        params.set_sort(Some(SortField::Roas), SortDirection::Desc);
        let page = campaigns::transform(&mock_data::campaigns(), &params);

        let json = report_json(&page.campaigns);
        assert_eq!(json["reportDate"], "2024-07-15");
        assert_eq!(json["campaigns"].as_array().unwrap().len(), 5);
        assert_eq!(json["chartData"]["trafficSources"].as_array().unwrap().len(), 5);

        let summary = &json["summary"];
        assert_eq!(summary["totalCampaigns"], 5);
        assert_eq!(summary["totalRevenue"], 142850.0);
        let expected_roas = page.campaigns.iter().map(|c| c.roas).sum::<f64>() / 5.0;
        let average = summary["averageROAS"].as_f64().unwrap();
        assert!((average - expected_roas).abs() < 1e-9);
    }

    #[test]
    fn empty_page_reports_zero_average() {
        let json = report_json(&[]);
        assert_eq!(json["summary"]["totalCampaigns"], 0);
        assert_eq!(json["summary"]["averageROAS"], 0.0);
        assert_eq!(json["summary"]["totalBudget"], 0.0);
    }
}
