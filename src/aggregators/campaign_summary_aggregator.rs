use serde::Serialize;

use crate::models::{Campaign, CampaignStatus};

/// Totals over whatever campaigns are currently loaded (normally one page).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CampaignTotals {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_budget: f64,
    pub total_spent: f64,
    pub average_roas: f64,
}

impl CampaignTotals {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let total_campaigns = campaigns.len();
        let average_roas = if total_campaigns == 0 {
            0.0
        } else {
            campaigns.iter().map(|c| c.roas).sum::<f64>() / total_campaigns as f64
        };

        Self {
            total_campaigns,
            active_campaigns: campaigns
                .iter()
                .filter(|c| c.status == CampaignStatus::Active)
                .count(),
            total_budget: campaigns.iter().map(|c| c.budget).sum(),
            total_spent: campaigns.iter().map(|c| c.spent).sum(),
            average_roas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;

    #[test]
    fn totals_over_mock_campaigns() {
        let totals = CampaignTotals::from_campaigns(&mock_data::campaigns());
        assert_eq!(totals.total_campaigns, 8);
        assert_eq!(totals.active_campaigns, 5);
        assert_eq!(totals.total_budget, 96500.0);
        assert_eq!(totals.total_spent, 81700.0);
        assert!((totals.average_roas - 3.05).abs() < 1e-9);
    }

    #[test]
    fn empty_page_averages_to_zero() {
        let totals = CampaignTotals::from_campaigns(&[]);
        assert_eq!(totals.total_campaigns, 0);
        assert_eq!(totals.average_roas, 0.0);
    }
}
