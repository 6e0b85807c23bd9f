use csv::{QuoteStyle, WriterBuilder};

use super::UNAVAILABLE;
use crate::aggregators::{Kpi, MetricsAggregator};
use crate::error::ExportError;
use crate::models::{Campaign, ChartData, Metrics};

/// A row type with a fixed column order.
pub(crate) trait CsvRow {
    fn headers() -> &'static [&'static str];
    fn to_csv_row(&self) -> Vec<String>;
}

pub(crate) fn write_rows<R: CsvRow>(rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(R::headers())?;
    for row in rows {
        writer.write_record(row.to_csv_row())?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn percent_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => UNAVAILABLE.to_string(),
    }
}

struct MetricRow {
    kpi: Kpi,
    current: f64,
    previous: f64,
    change: Option<f64>,
    target: f64,
    progress: Option<f64>,
}

impl CsvRow for MetricRow {
    fn headers() -> &'static [&'static str] {
        &[
            "Metric",
            "Current",
            "Previous",
            "Change (%)",
            "Target",
            "Progress (%)",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.kpi.label().to_string(),
            self.current.to_string(),
            self.previous.to_string(),
            percent_cell(self.change),
            self.target.to_string(),
            percent_cell(self.progress),
        ]
    }
}

pub(crate) fn metrics_table(metrics: &Metrics) -> Result<Vec<u8>, ExportError> {
    let rows: Vec<MetricRow> = MetricsAggregator::summarize(metrics)
        .into_iter()
        .map(|summary| MetricRow {
            kpi: summary.kpi,
            current: summary.current,
            previous: summary.previous,
            change: summary.change,
            target: summary.target,
            progress: summary.progress.percent(),
        })
        .collect();
    write_rows(&rows)
}

/// Chart rows share one header; cells that do not apply to a series stay empty.
#[derive(Default)]
struct ChartRow {
    data_type: &'static str,
    period: String,
    current_year: String,
    previous_year: String,
    total_users: String,
    new_users: String,
    source: String,
    users: String,
    color: String,
    index: usize,
}

impl CsvRow for ChartRow {
    fn headers() -> &'static [&'static str] {
        &[
            "Data Type",
            "Period",
            "Current Year",
            "Previous Year",
            "Total Users",
            "New Users",
            "Source",
            "Users",
            "Color",
            "Index",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.data_type.to_string(),
            self.period.clone(),
            self.current_year.clone(),
            self.previous_year.clone(),
            self.total_users.clone(),
            self.new_users.clone(),
            self.source.clone(),
            self.users.clone(),
            self.color.clone(),
            self.index.to_string(),
        ]
    }
}

pub(crate) fn charts_table(charts: &ChartData) -> Result<Vec<u8>, ExportError> {
    let revenue = charts.revenue.iter().enumerate().map(|(index, point)| ChartRow {
        data_type: "Revenue",
        period: point.month.clone(),
        current_year: point.current.to_string(),
        previous_year: point.previous.to_string(),
        index,
        ..ChartRow::default()
    });
    let user_growth = charts
        .user_growth
        .iter()
        .enumerate()
        .map(|(index, point)| ChartRow {
            data_type: "User Growth",
            period: point.month.clone(),
            total_users: point.users.to_string(),
            new_users: point.new_users.to_string(),
            index,
            ..ChartRow::default()
        });
    let traffic = charts
        .traffic_sources
        .iter()
        .enumerate()
        .map(|(index, point)| ChartRow {
            data_type: "Traffic Sources",
            source: point.name.clone(),
            users: point.value.to_string(),
            color: point.color.clone(),
            index,
            ..ChartRow::default()
        });

    let rows: Vec<ChartRow> = revenue.chain(user_growth).chain(traffic).collect();
    write_rows(&rows)
}

impl CsvRow for Campaign {
    fn headers() -> &'static [&'static str] {
        &[
            "Campaign Name",
            "Status",
            "Budget",
            "Spent",
            "Impressions",
            "Clicks",
            "Conversions",
            "CPA",
            "ROAS",
            "Start Date",
            "End Date",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.to_string(),
            self.budget.to_string(),
            self.spent.to_string(),
            self.impressions.to_string(),
            self.clicks.to_string(),
            self.conversions.to_string(),
            self.cpa.to_string(),
            self.roas.to_string(),
            self.start_date.clone(),
            self.end_date.clone(),
        ]
    }
}

pub(crate) fn campaigns_table(campaigns: &[Campaign]) -> Result<Vec<u8>, ExportError> {
    write_rows(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;
    use crate::models::{CampaignStatus, MetricSnapshot};

    fn lines(body: &[u8]) -> Vec<String> {
        std::str::from_utf8(body)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn metrics_rows_follow_kpi_order() {
        let body = metrics_table(&mock_data::metrics()).unwrap();
        let lines = lines(&body);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Total Revenue,142850,124300,14.9,150000,95.2");
        assert!(lines[2].starts_with("Active Users,"));
        assert!(lines[3].starts_with("Conversion Rate,"));
        assert!(lines[4].starts_with("Growth Rate,"));
    }

    #[test]
    fn zero_target_gets_a_placeholder() {
        let mut metrics = mock_data::metrics();
        metrics.growth = MetricSnapshot {
            current: 18.7,
            previous: 0.0,
            change: None,
            target: 0.0,
        };

        let body = metrics_table(&metrics).unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(!text.contains("NaN"));
        assert!(!text.contains("inf"));
        assert_eq!(
            lines(&body)[4],
            "Growth Rate,18.7,0,unavailable,0,unavailable"
        );
    }

    #[test]
    fn chart_rows_keep_per_series_index() {
        let body = charts_table(&mock_data::chart_data()).unwrap();
        let lines = lines(&body);
        assert_eq!(
            lines[0],
            "Data Type,Period,Current Year,Previous Year,Total Users,New Users,Source,Users,Color,Index"
        );
        assert_eq!(lines.len(), 1 + 7 + 7 + 5);
        assert_eq!(lines[1], "Revenue,Jan,82000,65000,,,,,,0");
        assert_eq!(lines[8], "User Growth,Jan,,,8500,1200,,,,0");
        assert_eq!(lines[15], "Traffic Sources,,,,,,Organic Search,4847,#8b5cf6,0");
        assert!(lines[19].ends_with(",4"));
    }

    #[test]
    fn campaign_names_with_delimiters_are_quoted() {
        let mut campaign = mock_data::campaigns().remove(0);
        campaign.name = "Sale, \"Big\" Edition".to_string();
        campaign.status = CampaignStatus::Paused;

        let body = campaigns_table(&[campaign]).unwrap();
        let lines = lines(&body);
        assert_eq!(
            lines[0],
            "Campaign Name,Status,Budget,Spent,Impressions,Clicks,Conversions,CPA,ROAS,Start Date,End Date"
        );
        assert!(lines[1].starts_with("\"Sale, \"\"Big\"\" Edition\",Paused,"));
    }
}
