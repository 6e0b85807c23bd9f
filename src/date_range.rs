//! Date range presets and their resolution into concrete day bounds.
//!
//! Presets are resolved against "today" every time they are used, so a
//! `Last7Days` selection kept in the dashboard state moves forward with the
//! clock instead of freezing at the moment it was picked.

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::QueryError;

pub const API_DATE_FORMAT: &str = "%Y-%m-%d";
const LABEL_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePreset {
    Last7Days,
    Last30Days,
    Last3Months,
    ThisMonth,
    LastMonth,
    ThisYear,
    AllTime,
}

impl DatePreset {
    pub fn resolve(self) -> Option<DateRange> {
        self.resolve_at(Utc::now().date_naive())
    }

    pub fn resolve_at(self, today: NaiveDate) -> Option<DateRange> {
        let range = match self {
            DatePreset::Last7Days => DateRange::between(today - chrono::Duration::days(6), today),
            DatePreset::Last30Days => {
                DateRange::between(today - chrono::Duration::days(29), today)
            }
            DatePreset::Last3Months => DateRange::between(
                today
                    .checked_sub_months(Months::new(3))
                    .unwrap_or(NaiveDate::MIN),
                today,
            ),
            DatePreset::ThisMonth => {
                let (first, last) = month_bounds(today.year(), today.month())?;
                DateRange::between(first, last)
            }
            DatePreset::LastMonth => {
                let previous = today.checked_sub_months(Months::new(1))?;
                let (first, last) = month_bounds(previous.year(), previous.month())?;
                DateRange::between(first, last)
            }
            DatePreset::ThisYear => DateRange::between(
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
            ),
            DatePreset::AllTime => return None,
        };
        Some(range)
    }
}

impl FromStr for DatePreset {
    type Err = QueryError;

    /// Accepts `last7days`, `last_7_days`, `Last7Days` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "last7days" => Ok(DatePreset::Last7Days),
            "last30days" => Ok(DatePreset::Last30Days),
            "last3months" => Ok(DatePreset::Last3Months),
            "thismonth" => Ok(DatePreset::ThisMonth),
            "lastmonth" => Ok(DatePreset::LastMonth),
            "thisyear" => Ok(DatePreset::ThisYear),
            "alltime" => Ok(DatePreset::AllTime),
            _ => Err(QueryError::UnknownPreset(s.to_string())),
        }
    }
}

fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Inclusive day bounds. `to == None` is an open upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Self {
        match to {
            Some(to) if to < from => Self {
                from: to,
                to: Some(from),
            },
            _ => Self { from, to },
        }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self::new(from, Some(to))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && self.to.map_or(true, |to| date <= to)
    }

    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!(
                "{} - {}",
                self.from.format(LABEL_DATE_FORMAT),
                to.format(LABEL_DATE_FORMAT)
            ),
            None => self.from.format(LABEL_DATE_FORMAT).to_string(),
        }
    }

    /// `start_date` / `end_date` query pairs; an open upper bound only sends
    /// `start_date`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("start_date", format_api_date(self.from))];
        if let Some(to) = self.to {
            pairs.push(("end_date", format_api_date(to)));
        }
        pairs
    }
}

/// What the user picked: a preset, or explicit calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSelection {
    Preset(DatePreset),
    Explicit {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl Default for DateSelection {
    fn default() -> Self {
        DateSelection::Preset(DatePreset::Last30Days)
    }
}

impl DateSelection {
    pub fn resolve(&self) -> Option<DateRange> {
        self.resolve_at(Utc::now().date_naive())
    }

    pub fn resolve_at(&self, today: NaiveDate) -> Option<DateRange> {
        match *self {
            DateSelection::Preset(preset) => preset.resolve_at(today),
            DateSelection::Explicit { from: Some(from), to } => Some(DateRange::new(from, to)),
            DateSelection::Explicit { from: None, .. } => None,
        }
    }
}

pub fn query_pairs(range: Option<&DateRange>) -> Vec<(&'static str, String)> {
    range.map(DateRange::query_pairs).unwrap_or_default()
}

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

pub fn parse_api_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value.trim(), API_DATE_FORMAT)
        .map_err(|_| QueryError::InvalidDate(value.to_string()))
}
