//! Remote bookmark service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::OneHackConfig;
use crate::error::{OneHackError, OneHackResult};
use crate::hackathon::{BookmarkList, BookmarkResponse, HackathonRecord};
use crate::http::{endpoint, with_timeout};

/// The authoritative bookmark store for signed-in users.
#[async_trait]
pub trait BookmarkService: Send + Sync {
    /// Every bookmark saved for `user_id`.
    async fn list(&self, user_id: &str, token: &str) -> OneHackResult<Vec<HackathonRecord>>;

    async fn create(&self, record_id: &str, token: &str) -> OneHackResult<String>;

    async fn delete(&self, record: &HackathonRecord, token: &str) -> OneHackResult<String>;
}

#[derive(Debug, Clone)]
pub struct HttpBookmarkService {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
}

impl HttpBookmarkService {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        HttpBookmarkService {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            timeout,
        }
    }

    pub fn from_config(config: &OneHackConfig) -> Self {
        Self::new(config.bookmark_api_base.clone(), config.request_timeout)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: &str,
        wrap: fn(String) -> OneHackError,
    ) -> OneHackResult<T> {
        let request = request.bearer_auth(token);

        let (status, body) = with_timeout(self.timeout, wrap, async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await?;

        decode_response(status, &body, wrap)
    }
}

#[async_trait]
impl BookmarkService for HttpBookmarkService {
    async fn list(&self, user_id: &str, token: &str) -> OneHackResult<Vec<HackathonRecord>> {
        let url = endpoint(&self.api_base, &["get-bookmarks", user_id])?;
        debug!(%url, "fetching bookmarks");

        let list: BookmarkList = self
            .send(self.client.get(url), token, OneHackError::Fetch)
            .await?;

        Ok(list.hackathons)
    }

    async fn create(&self, record_id: &str, token: &str) -> OneHackResult<String> {
        let url = endpoint(&self.api_base, &["bookmark", record_id])?;
        debug!(%url, "creating bookmark");

        let response: BookmarkResponse = self
            .send(self.client.post(url), token, OneHackError::BookmarkWrite)
            .await?;

        check_write(response)
    }

    async fn delete(&self, record: &HackathonRecord, token: &str) -> OneHackResult<String> {
        let record_id = record
            .id
            .as_deref()
            .ok_or_else(|| OneHackError::MissingId(record.title.clone()))?;
        let url = endpoint(&self.api_base, &["bookmark", record_id])?;
        debug!(%url, "deleting bookmark");

        let response: BookmarkResponse = self
            .send(
                self.client.delete(url).json(record),
                token,
                OneHackError::BookmarkWrite,
            )
            .await?;

        check_write(response)
    }
}

/// Map status and body to a value, reporting failures through `wrap`.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    wrap: fn(String) -> OneHackError,
) -> OneHackResult<T> {
    if !status.is_success() {
        return Err(wrap(format!("server responded with {status}")));
    }

    serde_json::from_str(body).map_err(|e| wrap(format!("Failed to parse response: {e}")))
}

fn check_write(response: BookmarkResponse) -> OneHackResult<String> {
    if response.success == Some(false) {
        let reason = if response.message.is_empty() {
            "server rejected the request".to_string()
        } else {
            response.message
        };
        return Err(OneHackError::BookmarkWrite(reason));
    }

    Ok(response.message)
}
