//! Read-only queries against the hackathon listing API.
//!
//! Every call is a fresh round trip: no retries, no caching. A non-2xx
//! status or an envelope with `success: false` is a `Fetch` error, never a
//! partial result.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::config::OneHackConfig;
use crate::error::{OneHackError, OneHackResult};
use crate::filter::FilterState;
use crate::hackathon::{ApiEnvelope, HackathonRecord, Platform};
use crate::http::{endpoint, with_timeout};

#[derive(Debug, Clone)]
pub struct HackathonFetcher {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl HackathonFetcher {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        HackathonFetcher {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            timeout,
        }
    }

    pub fn from_config(config: &OneHackConfig) -> Self {
        Self::new(config.api_base.clone(), config.request_timeout)
    }

    /// The full, unfiltered listing.
    pub async fn all(&self) -> OneHackResult<Vec<HackathonRecord>> {
        self.get(self.all_url()?).await
    }

    /// One platform's listing, filtered server-side.
    pub async fn by_platform(&self, platform: &Platform) -> OneHackResult<Vec<HackathonRecord>> {
        self.get(self.platform_url(platform)?).await
    }

    /// Server-side free-text search.
    pub async fn search(&self, query: &str) -> OneHackResult<Vec<HackathonRecord>> {
        self.get(self.search_url(query)?).await
    }

    /// Server-side filtering on location and platforms. The search text and
    /// date range of `filters` are not sent.
    pub async fn filter(&self, filters: &FilterState) -> OneHackResult<Vec<HackathonRecord>> {
        self.get(self.filter_url(filters)?).await
    }

    pub fn all_url(&self) -> OneHackResult<Url> {
        endpoint(&self.api_base, &["get-all-hackathons"])
    }

    pub fn platform_url(&self, platform: &Platform) -> OneHackResult<Url> {
        endpoint(&self.api_base, &[&format!("get-{}", platform.as_str())])
    }

    pub fn search_url(&self, query: &str) -> OneHackResult<Url> {
        let mut url = endpoint(&self.api_base, &["search"])?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    pub fn filter_url(&self, filters: &FilterState) -> OneHackResult<Url> {
        let mut url = self.all_url()?;
        let pairs = filters.query_pairs();

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    async fn get(&self, url: Url) -> OneHackResult<Vec<HackathonRecord>> {
        debug!(%url, "fetching hackathons");

        let (status, body) = with_timeout(self.timeout, OneHackError::Fetch, async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await?;

        let records = decode_listing(status, &body)?;
        debug!(%url, count = records.len(), "fetched hackathons");
        Ok(records)
    }
}

/// Turn a listing response into records, or a `Fetch` error.
pub fn decode_listing(status: StatusCode, body: &str) -> OneHackResult<Vec<HackathonRecord>> {
    if !status.is_success() {
        return Err(OneHackError::Fetch(format!("server responded with {status}")));
    }

    let envelope: ApiEnvelope = serde_json::from_str(body)
        .map_err(|e| OneHackError::Fetch(format!("Failed to parse response: {e}")))?;

    if !envelope.success {
        return Err(OneHackError::Fetch("API returned unsuccessful response".into()));
    }

    Ok(envelope.hackathons)
}
