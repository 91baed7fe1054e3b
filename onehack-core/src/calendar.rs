//! "Add to calendar" links.
//!
//! The listing server renders the calendar entry itself; the client only
//! needs the URL to open.

use url::Url;

use crate::error::{OneHackError, OneHackResult};
use crate::hackathon::HackathonRecord;
use crate::http::endpoint;

pub fn calendar_url(api_base: &str, record: &HackathonRecord) -> OneHackResult<Url> {
    let id = record
        .id
        .as_deref()
        .ok_or_else(|| OneHackError::MissingId(record.title.clone()))?;

    endpoint(api_base, &["add-to-calendar", id])
}
