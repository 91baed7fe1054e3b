//! Shared setup for commands: configuration, API clients, bookmark store.

use std::sync::Arc;

use anyhow::Result;
use onehack_core::bookmark_api::HttpBookmarkService;
use onehack_core::bookmarks::BookmarkStore;
use onehack_core::config::OneHackConfig;
use onehack_core::credentials::Credentials;
use onehack_core::fetcher::HackathonFetcher;
use onehack_core::hackathon::HackathonRecord;
use onehack_core::storage::FileStore;
use tracing::debug;

use crate::identity::CliIdentity;

pub struct App {
    pub config: OneHackConfig,
    pub fetcher: HackathonFetcher,
}

impl App {
    pub fn load() -> Result<Self> {
        let config = OneHackConfig::load()?;
        let fetcher = HackathonFetcher::from_config(&config);

        Ok(App { config, fetcher })
    }

    pub fn bookmark_store(&self) -> Result<Arc<BookmarkStore>> {
        let identity = Arc::new(CliIdentity::new(Credentials::path()?));
        let remote = Arc::new(HttpBookmarkService::from_config(&self.config));
        let cache = Arc::new(FileStore::new(self.config.cache_path()));

        Ok(Arc::new(BookmarkStore::new(
            identity,
            remote,
            cache,
            self.config.storage_key.clone(),
        )))
    }

    /// Look a hackathon up by id, preferring the bookmark list over a
    /// listing round trip.
    pub async fn find_record(&self, store: &BookmarkStore, id: &str) -> Result<HackathonRecord> {
        if let Some(record) = store
            .entries()
            .into_iter()
            .find(|r| r.id.as_deref() == Some(id))
        {
            return Ok(record);
        }

        debug!(id, "Not bookmarked, looking it up in the listing");
        self.fetcher
            .all()
            .await?
            .into_iter()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| anyhow::anyhow!("Hackathon '{}' not found", id))
    }
}
