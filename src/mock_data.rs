use crate::models::{
    Campaign, CampaignStatus, ChartData, MetricSnapshot, Metrics, RevenuePoint,
    TrafficSourcePoint, UserGrowthPoint,
};

pub fn metrics() -> Metrics {
    Metrics {
        revenue: snapshot(142850.0, 124300.0, 14.9, 150000.0),
        users: snapshot(12847.0, 11203.0, 14.7, 15000.0),
        conversions: snapshot(2.4, 2.1, 14.3, 3.0),
        growth: snapshot(18.7, 12.4, 50.8, 20.0),
    }
}

fn snapshot(current: f64, previous: f64, change: f64, target: f64) -> MetricSnapshot {
    MetricSnapshot {
        current,
        previous,
        change: Some(change),
        target,
    }
}

const MONTHS: [&str; 7] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul"];

pub fn chart_data() -> ChartData {
    let revenue = [
        (82000.0, 65000.0),
        (89000.0, 70000.0),
        (95000.0, 75000.0),
        (105000.0, 85000.0),
        (118000.0, 95000.0),
        (125000.0, 105000.0),
        (142850.0, 124300.0),
    ];
    let user_growth = [
        (8500, 1200),
        (9200, 1350),
        (9800, 1100),
        (10600, 1400),
        (11400, 1250),
        (12100, 1380),
        (12847, 1520),
    ];
    let traffic_sources = [
        ("Organic Search", 4847, "#8b5cf6"),
        ("Social Media", 3421, "#06b6d4"),
        ("Direct Traffic", 2154, "#10b981"),
        ("Paid Ads", 1876, "#f59e0b"),
        ("Email", 549, "#ef4444"),
    ];

    ChartData {
        revenue: MONTHS
            .iter()
            .zip(revenue)
            .map(|(month, (current, previous))| RevenuePoint {
                month: month.to_string(),
                current,
                previous,
            })
            .collect(),
        user_growth: MONTHS
            .iter()
            .zip(user_growth)
            .map(|(month, (users, new_users))| UserGrowthPoint {
                month: month.to_string(),
                users,
                new_users,
            })
            .collect(),
        traffic_sources: traffic_sources
            .into_iter()
            .map(|(name, value, color)| TrafficSourcePoint {
                name: name.to_string(),
                value,
                color: color.to_string(),
            })
            .collect(),
    }
}

pub fn campaigns() -> Vec<Campaign> {
    use CampaignStatus::*;

    #[rustfmt::skip]
    let rows = [
        (1, "Summer Sale Campaign", Active, 15000.0, 12450.0, 245000, 12250, 294, 42.35, 3.2, "2024-06-01", "2024-07-31"),
        (2, "Brand Awareness Push", Active, 8000.0, 6750.0, 180000, 7200, 216, 31.25, 2.8, "2024-06-15", "2024-08-15"),
        (3, "Product Launch Blitz", Completed, 25000.0, 24800.0, 320000, 19200, 576, 43.06, 4.1, "2024-05-01", "2024-06-30"),
        (4, "Holiday Special Prep", Paused, 5000.0, 2100.0, 95000, 3800, 114, 18.42, 2.1, "2024-07-01", "2024-09-01"),
        (5, "Retargeting Excellence", Active, 12000.0, 9200.0, 150000, 9000, 360, 25.56, 3.8, "2024-06-01", "2024-08-31"),
        (6, "Mobile App Install", Active, 18000.0, 14200.0, 410000, 16400, 492, 28.86, 3.1, "2024-05-15", "2024-08-15"),
        (7, "Video Content Boost", Completed, 7500.0, 7350.0, 125000, 6250, 188, 39.10, 2.4, "2024-04-01", "2024-05-31"),
        (8, "Local Business Drive", Active, 6000.0, 4850.0, 89000, 4450, 133, 36.47, 2.9, "2024-06-20", "2024-08-20"),
    ];

    rows.into_iter()
        .map(|row| Campaign {
            id: row.0.to_string(),
            name: row.1.to_string(),
            status: row.2,
            budget: row.3,
            spent: row.4,
            impressions: row.5,
            clicks: row.6,
            conversions: row.7,
            cpa: row.8,
            roas: row.9,
            start_date: row.10.to_string(),
            end_date: row.11.to_string(),
        })
        .collect()
}
