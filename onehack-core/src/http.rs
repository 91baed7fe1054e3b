//! Shared plumbing for the listing and bookmark APIs.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use url::Url;

use crate::error::{OneHackError, OneHackResult};

/// Append `segments` to an API base such as `https://host/api`. Each
/// segment is percent-encoded, so ids cannot change the route.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> OneHackResult<Url> {
    let mut url =
        Url::parse(base).map_err(|e| OneHackError::Config(format!("Invalid API URL '{base}': {e}")))?;

    url.path_segments_mut()
        .map_err(|_| OneHackError::Config(format!("Invalid API URL '{base}': cannot be a base")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Run a request future under `limit`. Transport errors and timeouts are
/// both reported through `wrap`, so callers see a single failure kind.
pub(crate) async fn with_timeout<T, F>(
    limit: Duration,
    wrap: fn(String) -> OneHackError,
    fut: F,
) -> OneHackResult<T>
where
    F: Future<Output = reqwest::Result<T>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(wrap(e.to_string())),
        Err(_) => Err(wrap(format!(
            "request timed out after {}",
            humantime::format_duration(limit)
        ))),
    }
}
