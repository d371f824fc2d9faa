use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Time Range - lookback window selected on the dashboard
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "today")]
    Today,
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
    #[serde(rename = "1y")]
    OneYear,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Today,
        TimeRange::SevenDays,
        TimeRange::ThirtyDays,
        TimeRange::NinetyDays,
        TimeRange::OneYear,
    ];

    /// Resolve a range tag, falling back to the 7-day window for anything unknown
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::debug!(tag = %tag, "Unknown time range tag, using 7d");
            TimeRange::SevenDays
        })
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::SevenDays => "7d",
            TimeRange::ThirtyDays => "30d",
            TimeRange::NinetyDays => "90d",
            TimeRange::OneYear => "1y",
        }
    }

    /// Human label used by the dashboard header
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Today => "Today",
            TimeRange::SevenDays => "Last 7 days",
            TimeRange::ThirtyDays => "Last 30 days",
            TimeRange::NinetyDays => "Last 90 days",
            TimeRange::OneYear => "Last year",
        }
    }

    pub fn window(&self) -> Duration {
        match self {
            TimeRange::Today => Duration::days(1),
            TimeRange::SevenDays => Duration::days(7),
            TimeRange::ThirtyDays => Duration::days(30),
            TimeRange::NinetyDays => Duration::days(90),
            TimeRange::OneYear => Duration::days(365),
        }
    }

    /// Inclusive lower edge of the window ending at `now`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window()
    }

    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        date >= self.start(now) && date <= now
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown time range: {0} (expected one of today, 7d, 30d, 90d, 1y)")]
pub struct UnknownTimeRange(pub String);

impl FromStr for TimeRange {
    type Err = UnknownTimeRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.tag() == s)
            .ok_or_else(|| UnknownTimeRange(s.to_string()))
    }
}
