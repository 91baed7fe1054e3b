//! Listing filters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::hackathon::{HackathonRecord, Platform};

/// Venue restriction for the filter endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationFilter {
    #[default]
    All,
    #[serde(alias = "remote")]
    Online,
    Offline,
}

impl LocationFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationFilter::All => "all",
            LocationFilter::Online => "online",
            LocationFilter::Offline => "offline",
        }
    }
}

impl FromStr for LocationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LocationFilter::All),
            "online" | "remote" => Ok(LocationFilter::Online),
            "offline" => Ok(LocationFilter::Offline),
            other => Err(format!(
                "Invalid location '{}'. Expected one of: all, online, offline",
                other
            )),
        }
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Date bounds for narrowing a listing.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse optional YYYY-MM-DD bounds. `from` is the start of its day,
    /// `to` the end of its day.
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let from = from.map(parse_date_start).transpose()?;
        let to = to.map(parse_date_end).transpose()?;

        if let (Some(f), Some(t)) = (from, to)
            && f > t
        {
            return Err("Start of date range is after its end".to_string());
        }

        Ok(DateRange { from, to })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// True when the record's run overlaps the range. Records with
    /// unparseable dates only match an unbounded range.
    pub fn overlaps(&self, record: &HackathonRecord) -> bool {
        if self.is_unbounded() {
            return true;
        }

        let (Some(start), Some(end)) = (record.starts_at(), record.ends_at()) else {
            return false;
        };

        let after_from = self.from.is_none_or(|from| end >= from);
        let before_to = self.to.is_none_or(|to| start <= to);
        after_from && before_to
    }
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<DateTime<Utc>, String> {
    let date = parse_date(s)?;
    date.and_hms_opt(0, 0, 0)
        .map(|d| d.and_utc())
        .ok_or_else(|| format!("Invalid date '{}'", s))
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> Result<DateTime<Utc>, String> {
    let date = parse_date(s)?;
    date.and_hms_opt(23, 59, 59)
        .map(|d| d.and_utc())
        .ok_or_else(|| format!("Invalid date '{}'", s))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

/// What the user asked to see.
///
/// Only `location` and `platforms` reach the filter endpoint. `search` goes
/// through the search endpoint instead and `date_range` is applied locally
/// by callers that want it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Empty means no platform restriction.
    pub platforms: Vec<Platform>,
    pub location: LocationFilter,
    pub search: String,
    pub date_range: DateRange,
}

impl FilterState {
    /// Add a platform, ignoring duplicates so the list behaves as a set.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        if !self.platforms.contains(&platform) {
            self.platforms.push(platform);
        }
        self
    }

    pub fn with_location(mut self, location: LocationFilter) -> Self {
        self.location = location;
        self
    }

    /// Query parameters for the filter endpoint: `mode` first (omitted for
    /// `all`), then one `p` per platform.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if self.location != LocationFilter::All {
            pairs.push(("mode", self.location.as_str().to_string()));
        }

        for platform in &self.platforms {
            pairs.push(("p", platform.as_str().to_string()));
        }

        pairs
    }
}
