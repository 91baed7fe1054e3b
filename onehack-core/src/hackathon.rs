//! Hackathon records as returned by the listing API.
//!
//! Records are immutable on the client: they are created from API responses,
//! displayed, and copied into the bookmark set, never edited. Timestamps are
//! kept as the strings the API sent so that bookmarks round-trip verbatim,
//! and are parsed on demand when a temporal status is needed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// One hackathon listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord")]
pub struct HackathonRecord {
    /// Missing on records stored by older clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    /// Venue or "online".
    pub mode: String,
    pub platform: Platform,
    pub url: String,

    // Optional details, only sent by some API versions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_end_date: Option<String>,
}

/// A record as the various API versions send it.
///
/// Every alternate spelling is its own field, so a record carrying both
/// `url` and `registrationUrl` still parses. `null` is accepted wherever a
/// value is optional.
#[derive(Deserialize)]
struct WireRecord {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default, rename = "startDate")]
    start_date_camel: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default, rename = "endDate")]
    end_date_camel: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    location: Option<String>,
    platform: Platform,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "registrationUrl")]
    registration_url_camel: Option<String>,
    #[serde(default)]
    registration_url: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prize_pool: Option<String>,
    #[serde(default, rename = "prizePool")]
    prize_pool_camel: Option<String>,
    #[serde(default)]
    registration_start_date: Option<String>,
    #[serde(default, rename = "registrationStartDate")]
    registration_start_date_camel: Option<String>,
    #[serde(default)]
    registration_end_date: Option<String>,
    #[serde(default, rename = "registrationEndDate")]
    registration_end_date_camel: Option<String>,
}

impl TryFrom<WireRecord> for HackathonRecord {
    type Error = String;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let start_date = wire
            .start_date
            .or(wire.start_date_camel)
            .ok_or_else(|| format!("missing start date for '{}'", wire.title))?;
        let end_date = wire
            .end_date
            .or(wire.end_date_camel)
            .ok_or_else(|| format!("missing end date for '{}'", wire.title))?;

        Ok(HackathonRecord {
            id: wire.id,
            title: wire.title,
            start_date,
            end_date,
            mode: wire.mode.or(wire.location).unwrap_or_default(),
            platform: wire.platform,
            url: wire
                .url
                .or(wire.registration_url_camel)
                .or(wire.registration_url)
                .unwrap_or_default(),
            tags: wire.tags.unwrap_or_default(),
            description: wire.description,
            prize_pool: wire.prize_pool.or(wire.prize_pool_camel),
            registration_start_date: wire
                .registration_start_date
                .or(wire.registration_start_date_camel),
            registration_end_date: wire
                .registration_end_date
                .or(wire.registration_end_date_camel),
        })
    }
}

/// Listing API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub hackathons: Vec<HackathonRecord>,
    pub success: bool,
}

/// Bookmark list response. The bookmark API omits the success flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkList {
    pub hackathons: Vec<HackathonRecord>,
}

/// Bookmark write response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkResponse {
    #[serde(default)]
    pub message: String,
    /// Some deployments report application-level failures here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// Where a hackathon sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HackathonStatus {
    Upcoming,
    Live,
    Past,
}

impl HackathonStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HackathonStatus::Upcoming => "Upcoming",
            HackathonStatus::Live => "Live",
            HackathonStatus::Past => "Ended",
        }
    }
}

/// Stable identity of a record, as shown in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Id(String),
    TitleStart(String, String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "{id}"),
            RecordKey::TitleStart(title, start) => write!(f, "{title} ({start})"),
        }
    }
}

impl HackathonRecord {
    /// Ids are compared when both records carry one, otherwise the
    /// (title, start date) pair stands in.
    pub fn same_record(&self, other: &HackathonRecord) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.title == other.title && self.start_date == other.start_date,
        }
    }

    pub fn key(&self) -> RecordKey {
        match &self.id {
            Some(id) => RecordKey::Id(id.clone()),
            None => RecordKey::TitleStart(self.title.clone(), self.start_date.clone()),
        }
    }

    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_date)
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end_date)
    }

    /// Classify the record against `now`. Returns `None` when either
    /// timestamp cannot be parsed.
    pub fn status_at(&self, now: DateTime<Utc>) -> Option<HackathonStatus> {
        let start = self.starts_at()?;
        let end = self.ends_at()?;

        let status = if now < start {
            HackathonStatus::Upcoming
        } else if now <= end {
            HackathonStatus::Live
        } else {
            HackathonStatus::Past
        };

        Some(status)
    }

    pub fn status(&self) -> Option<HackathonStatus> {
        self.status_at(Utc::now())
    }

    /// Whole days until the start, rounded up. Only defined while upcoming.
    pub fn days_until_start(&self, now: DateTime<Utc>) -> Option<i64> {
        let start = self.starts_at()?;
        let seconds = (start - now).num_seconds();

        if seconds <= 0 {
            return None;
        }

        Some((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
    }

    pub fn is_online(&self) -> bool {
        let mode = self.mode.to_lowercase();
        mode.contains("online") || mode.contains("remote")
    }
}

impl fmt::Display for HackathonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Parse an API timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Source platform of a hackathon. Unknown values are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Devfolio,
    Devpost,
    Unstop,
    Dorahacks,
    Other(String),
}

impl Platform {
    pub const KNOWN: [Platform; 4] = [
        Platform::Devfolio,
        Platform::Devpost,
        Platform::Unstop,
        Platform::Dorahacks,
    ];

    /// Value used in API paths and query strings.
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Devfolio => "devfolio",
            Platform::Devpost => "devpost",
            Platform::Unstop => "unstop",
            Platform::Dorahacks => "dorahacks",
            Platform::Other(name) => name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Platform::Devfolio => "Devfolio",
            Platform::Devpost => "DevPost",
            Platform::Unstop => "Unstop",
            Platform::Dorahacks => "DoraHacks",
            Platform::Other(name) => name,
        }
    }

    pub fn homepage(&self) -> Option<&'static str> {
        match self {
            Platform::Devfolio => Some("https://devfolio.co"),
            Platform::Devpost => Some("https://devpost.com"),
            Platform::Unstop => Some("https://unstop.com"),
            Platform::Dorahacks => Some("https://dorahacks.io"),
            Platform::Other(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Platform::Other(_))
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "devfolio" => Platform::Devfolio,
            "devpost" => Platform::Devpost,
            "unstop" => Platform::Unstop,
            "dorahacks" => Platform::Dorahacks,
            _ => Platform::Other(value),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::from(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep only records from `platform` (case-insensitive).
pub fn retain_platform(records: Vec<HackathonRecord>, platform: &Platform) -> Vec<HackathonRecord> {
    let wanted = platform.as_str().to_lowercase();
    records
        .into_iter()
        .filter(|r| r.platform.as_str().to_lowercase() == wanted)
        .collect()
}

/// Records grouped by status, each group in input order.
#[derive(Debug, Default, Clone)]
pub struct StatusGroups {
    pub upcoming: Vec<HackathonRecord>,
    pub live: Vec<HackathonRecord>,
    pub past: Vec<HackathonRecord>,
    /// Records whose dates could not be parsed.
    pub unknown: Vec<HackathonRecord>,
}

pub fn partition_by_status(records: &[HackathonRecord], now: DateTime<Utc>) -> StatusGroups {
    let mut groups = StatusGroups::default();

    for record in records {
        let bucket = match record.status_at(now) {
            Some(HackathonStatus::Upcoming) => &mut groups.upcoming,
            Some(HackathonStatus::Live) => &mut groups.live,
            Some(HackathonStatus::Past) => &mut groups.past,
            None => &mut groups.unknown,
        };
        bucket.push(record.clone());
    }

    groups
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn record(id: Option<&str>, title: &str, start: &str, end: &str) -> HackathonRecord {
        HackathonRecord {
            id: id.map(str::to_string),
            title: title.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            mode: "Online".to_string(),
            platform: Platform::Devfolio,
            url: "https://example.devfolio.co".to_string(),
            tags: vec![],
            description: None,
            prize_pool: None,
            registration_start_date: None,
            registration_end_date: None,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_status_live() {
        let r = record(Some("h1"), "Build Week", "2025-08-15", "2025-08-17");
        assert_eq!(r.status_at(at(2025, 8, 16)), Some(HackathonStatus::Live));
    }

    #[test]
    fn test_status_upcoming_with_days_to_go() {
        let r = record(Some("h1"), "Build Week", "2025-08-15", "2025-08-17");
        let now = at(2025, 8, 10);
        assert_eq!(r.status_at(now), Some(HackathonStatus::Upcoming));
        assert_eq!(r.days_until_start(now), Some(5));
    }

    #[test]
    fn test_days_until_start_rounds_up() {
        let r = record(None, "Build Week", "2025-08-15T00:00:00Z", "2025-08-17T00:00:00Z");
        let now = Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).unwrap();
        assert_eq!(r.days_until_start(now), Some(5));
    }

    #[test]
    fn test_status_past() {
        let r = record(Some("h1"), "Build Week", "2025-08-15", "2025-08-17");
        let now = at(2025, 8, 20);
        assert_eq!(r.status_at(now), Some(HackathonStatus::Past));
        assert_eq!(r.days_until_start(now), None);
    }

    #[test]
    fn test_status_boundaries_are_live() {
        let r = record(None, "Edge", "2025-08-15T09:00:00Z", "2025-08-17T18:00:00Z");
        let start = Utc.with_ymd_and_hms(2025, 8, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 8, 17, 18, 0, 0).unwrap();
        assert_eq!(r.status_at(start), Some(HackathonStatus::Live));
        assert_eq!(r.status_at(end), Some(HackathonStatus::Live));
    }

    #[test]
    fn test_status_unparseable_dates() {
        let r = record(None, "Mystery", "soon", "later");
        assert_eq!(r.status_at(at(2025, 1, 1)), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-20T15:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-20T20:30:00+05:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-20T15:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-20"), Some(at(2025, 3, 20)));
    }

    #[test]
    fn test_same_record_by_id() {
        let a = record(Some("x"), "A", "2025-01-01", "2025-01-02");
        let b = record(Some("x"), "Renamed", "2025-02-01", "2025-02-02");
        let c = record(Some("y"), "A", "2025-01-01", "2025-01-02");
        assert!(a.same_record(&b));
        assert!(!a.same_record(&c));
    }

    #[test]
    fn test_same_record_falls_back_to_title_and_start() {
        let a = record(None, "A", "2025-01-01", "2025-01-02");
        let b = record(Some("x"), "A", "2025-01-01", "2025-01-05");
        let c = record(None, "A", "2025-01-03", "2025-01-05");
        assert!(a.same_record(&b));
        assert!(!a.same_record(&c));
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("DevFolio".parse::<Platform>().unwrap(), Platform::Devfolio);
        assert_eq!("dorahacks".parse::<Platform>().unwrap(), Platform::Dorahacks);
        let other = "mlh".parse::<Platform>().unwrap();
        assert_eq!(other, Platform::Other("mlh".to_string()));
        assert!(!other.is_known());
        assert_eq!(other.display_name(), "mlh");
    }

    #[test]
    fn test_deserialize_api_record() {
        let json = r#"{
            "id": "66b1",
            "title": "HackMIT",
            "start_date": "2025-09-13",
            "end_date": "2025-09-14",
            "mode": "Cambridge, MA",
            "platform": "devpost",
            "url": "https://hackmit.org"
        }"#;
        let r: HackathonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.id.as_deref(), Some("66b1"));
        assert_eq!(r.platform, Platform::Devpost);
        assert!(r.tags.is_empty());
        assert!(!r.is_online());
    }

    #[test]
    fn test_deserialize_camel_case_record_without_id() {
        let json = r#"{
            "title": "ETHGlobal",
            "startDate": "2025-10-01T00:00:00Z",
            "endDate": "2025-10-03T00:00:00Z",
            "location": "Online",
            "platform": "somewhere-new",
            "registrationUrl": "https://ethglobal.com",
            "prizePool": "$50,000"
        }"#;
        let r: HackathonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, None);
        assert_eq!(r.platform, Platform::Other("somewhere-new".to_string()));
        assert_eq!(r.prize_pool.as_deref(), Some("$50,000"));
        assert!(r.is_online());
    }

    #[test]
    fn test_deserialize_null_optionals() {
        let json = r#"{
            "id": "66b1",
            "title": "HackMIT",
            "start_date": "2025-09-13",
            "end_date": "2025-09-14",
            "mode": "Online",
            "platform": "devpost",
            "url": "https://hackmit.org",
            "tags": null,
            "description": null,
            "prize_pool": null
        }"#;
        let r: HackathonRecord = serde_json::from_str(json).unwrap();
        assert!(r.tags.is_empty());
        assert_eq!(r.description, None);
        assert_eq!(r.prize_pool, None);
    }

    #[test]
    fn test_deserialize_both_spellings_prefers_primary() {
        let json = r#"{
            "title": "ETHGlobal",
            "start_date": "2025-10-01",
            "end_date": "2025-10-03",
            "mode": "Online",
            "location": "Lisbon",
            "platform": "dorahacks",
            "url": "https://ethglobal.com",
            "registrationUrl": "https://ethglobal.com/register"
        }"#;
        let r: HackathonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.mode, "Online");
        assert_eq!(r.url, "https://ethglobal.com");
    }

    #[test]
    fn test_deserialize_missing_start_date_fails() {
        let json = r#"{"title": "A", "end_date": "2025-01-02", "mode": "Online",
            "platform": "devpost", "url": "u"}"#;
        assert!(serde_json::from_str::<HackathonRecord>(json).is_err());
    }

    #[test]
    fn test_cached_record_round_trips() {
        let mut r = record(Some("x"), "A", "2025-01-01", "2025-01-02");
        r.tags = vec!["ai".into()];
        r.prize_pool = Some("$1,000".into());
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(serde_json::from_str::<HackathonRecord>(&json).unwrap(), r);
    }

    #[test]
    fn test_retain_platform_is_case_insensitive() {
        let mut a = record(Some("a"), "A", "2025-01-01", "2025-01-02");
        a.platform = Platform::Other("Unstop".to_string());
        let b = record(Some("b"), "B", "2025-01-01", "2025-01-02");
        let kept = retain_platform(vec![a, b], &Platform::Unstop);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_partition_by_status() {
        let records = vec![
            record(Some("1"), "Soon", "2025-08-15", "2025-08-17"),
            record(Some("2"), "Now", "2025-08-01", "2025-08-12"),
            record(Some("3"), "Done", "2025-07-01", "2025-07-03"),
            record(Some("4"), "Broken", "tbd", "tbd"),
        ];
        let groups = partition_by_status(&records, at(2025, 8, 10));
        assert_eq!(groups.upcoming[0].title, "Soon");
        assert_eq!(groups.live[0].title, "Now");
        assert_eq!(groups.past[0].title, "Done");
        assert_eq!(groups.unknown[0].title, "Broken");
    }
}
