//! The user's saved hackathons.
//!
//! When signed in, the remote bookmark service is authoritative and the
//! local cache is a write-through mirror of it. When signed out, the local
//! cache is all there is. Writes commit locally only after the remote
//! confirms them; a `load` replaces the whole list ("remote wins").
//!
//! Concurrent callers are allowed, with two guards:
//! - a record with an add/remove in flight rejects a second one
//!   (`OperationPending`)
//! - a `load` that finishes after a newer load or write has started is
//!   discarded

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::bookmark_api::BookmarkService;
use crate::error::{OneHackError, OneHackResult};
use crate::hackathon::HackathonRecord;
use crate::identity::Identity;
use crate::storage::KeyValueStore;

pub struct BookmarkStore {
    identity: Arc<dyn Identity>,
    remote: Arc<dyn BookmarkService>,
    cache: Arc<dyn KeyValueStore>,
    storage_key: String,

    entries: Mutex<Vec<HackathonRecord>>,
    /// Records with an add/remove in flight.
    pending: Mutex<Vec<HackathonRecord>>,
    in_flight: AtomicUsize,
    /// Bumped when a load starts and when a write commits.
    generation: AtomicU64,
    /// Bumped whenever `entries` changes.
    revision: watch::Sender<u64>,
}

impl BookmarkStore {
    pub fn new(
        identity: Arc<dyn Identity>,
        remote: Arc<dyn BookmarkService>,
        cache: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        let (revision, _) = watch::channel(0);

        BookmarkStore {
            identity,
            remote,
            cache,
            storage_key: storage_key.into(),
            entries: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            revision,
        }
    }

    /// Bookmarks in insertion order.
    pub fn entries(&self) -> Vec<HackathonRecord> {
        self.lock_entries().clone()
    }

    /// True while any load, add or remove is waiting on I/O.
    pub fn syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn is_bookmarked(&self, record: &HackathonRecord) -> bool {
        self.lock_entries().iter().any(|e| e.same_record(record))
    }

    /// Notified every time the bookmark list changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Best-effort refresh: failures are logged and the current list is kept.
    pub async fn load(&self) {
        if let Err(e) = self.try_load().await {
            warn!(error = %e, "Bookmark refresh failed");
        }
    }

    /// Replace the list with the remote one (signed in) or the local cache
    /// (signed out).
    pub async fn try_load(&self) -> OneHackResult<()> {
        let _syncing = InFlight::start(&self.in_flight);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let signed_in_user = self
            .identity
            .current_user_id()
            .filter(|_| self.identity.is_authenticated());

        let records = match &signed_in_user {
            Some(user_id) => {
                let token = self.identity.access_token().await?;
                self.remote.list(user_id, &token).await?
            }
            None => self.read_cache()?,
        };

        let mut entries = self.lock_entries();

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding bookmark list superseded by a newer change");
            return Ok(());
        }

        if signed_in_user.is_some()
            && let Err(e) = self.write_cache(&records)
        {
            warn!(error = %e, "Could not update local bookmark cache");
        }

        debug!(count = records.len(), "Bookmarks loaded");
        *entries = records;
        drop(entries);
        self.revision.send_modify(|rev| *rev += 1);

        Ok(())
    }

    pub async fn add(&self, record: &HackathonRecord) -> OneHackResult<()> {
        let _pending = Pending::start(&self.pending, record)?;
        let _syncing = InFlight::start(&self.in_flight);

        if self.identity.is_authenticated() {
            let record_id = remote_id(record)?;
            let token = self.identity.access_token().await?;
            let message = self
                .remote
                .create(record_id, &token)
                .await
                .inspect_err(|e| warn!(record_id, error = %e, "Could not add bookmark"))?;
            debug!(record_id, response = %message, "Bookmark created");
        }

        self.commit(|entries| {
            if !entries.iter().any(|e| e.same_record(record)) {
                entries.push(record.clone());
            }
        })
    }

    pub async fn remove(&self, record: &HackathonRecord) -> OneHackResult<()> {
        let _pending = Pending::start(&self.pending, record)?;
        let _syncing = InFlight::start(&self.in_flight);

        if self.identity.is_authenticated() {
            let record_id = remote_id(record)?;
            let token = self.identity.access_token().await?;
            let message = self
                .remote
                .delete(record, &token)
                .await
                .inspect_err(|e| warn!(record_id, error = %e, "Could not remove bookmark"))?;
            debug!(record_id, response = %message, "Bookmark deleted");
        }

        self.commit(|entries| entries.retain(|e| !e.same_record(record)))
    }

    /// Remove if bookmarked, add otherwise. Returns whether the record is
    /// bookmarked afterwards.
    pub async fn toggle(&self, record: &HackathonRecord) -> OneHackResult<bool> {
        if self.is_bookmarked(record) {
            self.remove(record).await?;
            Ok(false)
        } else {
            self.add(record).await?;
            Ok(true)
        }
    }

    /// Reload every `every` while signed in. The first load happens right
    /// away. The task ends on sign-out, when the store is dropped, or when
    /// the returned handle is dropped.
    pub fn spawn_refresh(self: &Arc<Self>, every: Duration) -> RefreshHandle {
        let store = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(store) = store.upgrade() else {
                    break;
                };

                if !store.identity.is_authenticated() {
                    debug!("Signed out, stopping bookmark refresh");
                    break;
                }

                store.load().await;
            }
        });

        RefreshHandle { task }
    }

    /// Apply `change` to a copy of the list, persist it, then swap it in.
    fn commit(&self, change: impl FnOnce(&mut Vec<HackathonRecord>)) -> OneHackResult<()> {
        let mut entries = self.lock_entries();
        let mut updated = entries.clone();
        change(&mut updated);

        if let Err(e) = self.write_cache(&updated) {
            // Signed in, the remote already has the change
            if !self.identity.is_authenticated() {
                return Err(e);
            }
            warn!(error = %e, "Could not update local bookmark cache");
        }

        *entries = updated;
        self.generation.fetch_add(1, Ordering::SeqCst);
        drop(entries);
        self.revision.send_modify(|rev| *rev += 1);

        Ok(())
    }

    fn read_cache(&self) -> OneHackResult<Vec<HackathonRecord>> {
        match self.cache.get(&self.storage_key)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                OneHackError::Serialization(format!("Corrupt bookmark cache: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write_cache(&self, records: &[HackathonRecord]) -> OneHackResult<()> {
        let json = serde_json::to_string(records)
            .map_err(|e| OneHackError::Serialization(e.to_string()))?;
        self.cache.set(&self.storage_key, &json)
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<HackathonRecord>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn remote_id(record: &HackathonRecord) -> OneHackResult<&str> {
    record
        .id
        .as_deref()
        .ok_or_else(|| OneHackError::MissingId(record.title.clone()))
}

/// Owns the periodic refresh task.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Resolves once the task has ended on its own (sign-out or store
    /// dropped). Must not be awaited again after it resolves.
    pub async fn finished(&mut self) {
        if let Err(e) = (&mut self.task).await
            && e.is_panic()
        {
            warn!(error = %e, "Bookmark refresh task panicked");
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Matches with `same_record`, so an id-less copy of a record collides
/// with the id-bearing one.
struct Pending<'a> {
    set: &'a Mutex<Vec<HackathonRecord>>,
    record: HackathonRecord,
}

impl<'a> Pending<'a> {
    fn start(set: &'a Mutex<Vec<HackathonRecord>>, record: &HackathonRecord) -> OneHackResult<Self> {
        let mut pending = set.lock().unwrap_or_else(PoisonError::into_inner);

        if pending.iter().any(|p| p.same_record(record)) {
            return Err(OneHackError::OperationPending(record.key().to_string()));
        }

        pending.push(record.clone());
        Ok(Pending {
            set,
            record: record.clone(),
        })
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut pending = self.set.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(pos) = pending.iter().position(|p| *p == self.record) {
            pending.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hackathon::tests::record;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::Notify;

    const KEY: &str = "bookmarkedHackathons";

    struct FakeIdentity {
        user: Mutex<Option<String>>,
        token: Option<String>,
    }

    impl FakeIdentity {
        fn signed_in() -> Self {
            FakeIdentity {
                user: Mutex::new(Some("auth0|42".into())),
                token: Some("tok".into()),
            }
        }

        fn signed_out() -> Self {
            FakeIdentity {
                user: Mutex::new(None),
                token: None,
            }
        }

        fn sign_out(&self) {
            *self.user.lock().unwrap() = None;
        }
    }

    #[async_trait]
    impl Identity for FakeIdentity {
        fn is_authenticated(&self) -> bool {
            self.user.lock().unwrap().is_some()
        }

        fn current_user_id(&self) -> Option<String> {
            self.user.lock().unwrap().clone()
        }

        async fn access_token(&self) -> OneHackResult<String> {
            self.token
                .clone()
                .ok_or_else(|| OneHackError::Token("no session".into()))
        }
    }

    #[derive(Default)]
    struct FakeService {
        saved: Mutex<Vec<HackathonRecord>>,
        list_calls: AtomicUsize,
        write_calls: AtomicUsize,
        fail_list: bool,
        fail_writes: AtomicBool,
        list_gate: Option<Arc<Notify>>,
        write_gate: Option<Arc<Notify>>,
    }

    impl FakeService {
        fn with_saved(records: Vec<HackathonRecord>) -> Self {
            FakeService {
                saved: Mutex::new(records),
                ..FakeService::default()
            }
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn write_calls(&self) -> usize {
            self.write_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookmarkService for FakeService {
        async fn list(&self, user_id: &str, token: &str) -> OneHackResult<Vec<HackathonRecord>> {
            assert_eq!(user_id, "auth0|42");
            assert_eq!(token, "tok");
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.list_gate {
                gate.notified().await;
            }
            if self.fail_list {
                return Err(OneHackError::Fetch("server responded with 503".into()));
            }
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn create(&self, record_id: &str, _token: &str) -> OneHackResult<String> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.write_gate {
                gate.notified().await;
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(OneHackError::BookmarkWrite(
                    "server responded with 500 Internal Server Error".into(),
                ));
            }
            let saved = record(Some(record_id), "remote", "2025-01-01", "2025-01-02");
            self.saved.lock().unwrap().push(saved);
            Ok("Bookmarked".into())
        }

        async fn delete(&self, record: &HackathonRecord, _token: &str) -> OneHackResult<String> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(OneHackError::BookmarkWrite(
                    "server responded with 500 Internal Server Error".into(),
                ));
            }
            self.saved.lock().unwrap().retain(|r| r.id != record.id);
            Ok("Removed".into())
        }
    }

    fn store_with(
        identity: FakeIdentity,
        service: FakeService,
    ) -> (Arc<BookmarkStore>, Arc<FakeIdentity>, Arc<FakeService>, Arc<MemoryStore>) {
        let identity = Arc::new(identity);
        let service = Arc::new(service);
        let cache = Arc::new(MemoryStore::new());
        let store = Arc::new(BookmarkStore::new(
            identity.clone(),
            service.clone(),
            cache.clone(),
            KEY,
        ));
        (store, identity, service, cache)
    }

    fn cached(cache: &MemoryStore) -> Option<Vec<HackathonRecord>> {
        cache
            .get(KEY)
            .unwrap()
            .map(|json| serde_json::from_str(&json).unwrap())
    }

    fn sample() -> HackathonRecord {
        record(Some("x"), "A", "2025-01-01", "2025-01-02")
    }

    #[tokio::test]
    async fn test_signed_out_add_persists_locally() {
        let (store, _, service, cache) = store_with(FakeIdentity::signed_out(), FakeService::default());

        store.add(&sample()).await.unwrap();

        assert!(store.is_bookmarked(&sample()));
        let saved = cached(&cache).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id.as_deref(), Some("x"));
        assert_eq!(service.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (store, _, _, cache) = store_with(FakeIdentity::signed_out(), FakeService::default());

        store.add(&sample()).await.unwrap();
        store.add(&sample()).await.unwrap();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(cached(&cache).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_after_add() {
        let (store, _, _, cache) = store_with(FakeIdentity::signed_out(), FakeService::default());

        store.add(&sample()).await.unwrap();
        store.remove(&sample()).await.unwrap();

        assert!(!store.is_bookmarked(&sample()));
        assert!(cached(&cache).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let (store, _, _, _) = store_with(FakeIdentity::signed_out(), FakeService::default());
        let other = record(None, "Old Style", "2024-06-01", "2024-06-02");
        store.add(&other).await.unwrap();

        assert!(store.toggle(&sample()).await.unwrap());
        assert!(!store.toggle(&sample()).await.unwrap());

        assert!(!store.is_bookmarked(&sample()));
        assert_eq!(store.entries(), vec![other]);
    }

    #[tokio::test]
    async fn test_signed_out_round_trip_through_cache() {
        let (store, identity, service, cache) =
            store_with(FakeIdentity::signed_out(), FakeService::default());
        let b = record(None, "B", "2025-03-01", "2025-03-03");
        store.add(&sample()).await.unwrap();
        store.add(&b).await.unwrap();

        let reloaded = BookmarkStore::new(identity, service, cache, KEY);
        reloaded.try_load().await.unwrap();

        assert_eq!(reloaded.entries(), store.entries());
        assert_eq!(reloaded.entries(), vec![sample(), b]);
    }

    #[tokio::test]
    async fn test_signed_out_load_without_cache_is_empty() {
        let (store, _, _, _) = store_with(FakeIdentity::signed_out(), FakeService::default());
        store.try_load().await.unwrap();
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cache_keeps_current_list() {
        let (store, _, _, cache) = store_with(FakeIdentity::signed_out(), FakeService::default());
        store.add(&sample()).await.unwrap();
        cache.set(KEY, "{not json").unwrap();

        let err = store.try_load().await.unwrap_err();

        assert!(matches!(err, OneHackError::Serialization(_)));
        assert_eq!(store.entries(), vec![sample()]);
    }

    #[tokio::test]
    async fn test_signed_in_load_remote_wins() {
        let remote = vec![
            record(Some("r1"), "Remote One", "2025-05-01", "2025-05-02"),
            record(Some("r2"), "Remote Two", "2025-06-01", "2025-06-02"),
        ];
        let (store, _, _, cache) =
            store_with(FakeIdentity::signed_in(), FakeService::with_saved(remote.clone()));
        cache
            .set(KEY, &serde_json::to_string(&vec![sample()]).unwrap())
            .unwrap();

        store.try_load().await.unwrap();

        assert_eq!(store.entries(), remote);
        assert_eq!(cached(&cache).unwrap(), remote);
        assert!(!store.is_bookmarked(&sample()));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let service = FakeService {
            fail_list: true,
            ..FakeService::default()
        };
        let (store, _, _, _) = store_with(FakeIdentity::signed_in(), service);
        store.add(&sample()).await.unwrap();

        store.load().await;

        assert_eq!(store.entries(), vec![sample()]);
        assert!(matches!(store.try_load().await, Err(OneHackError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_token_failure_is_reported() {
        let identity = FakeIdentity {
            user: Mutex::new(Some("auth0|42".into())),
            token: None,
        };
        let (store, _, service, cache) = store_with(identity, FakeService::default());

        let err = store.add(&sample()).await.unwrap_err();

        assert!(matches!(err, OneHackError::Token(_)));
        assert_eq!(service.write_calls(), 0);
        assert!(cached(&cache).is_none());
    }

    #[tokio::test]
    async fn test_signed_in_add_failure_changes_nothing() {
        let service = FakeService {
            fail_writes: AtomicBool::new(true),
            ..FakeService::default()
        };
        let (store, _, service, cache) = store_with(FakeIdentity::signed_in(), service);

        let err = store.add(&sample()).await.unwrap_err();

        assert!(matches!(err, OneHackError::BookmarkWrite(_)));
        assert!(store.entries().is_empty());
        assert!(cached(&cache).is_none());
        assert_eq!(service.write_calls(), 1);
        assert!(!store.syncing());
    }

    #[tokio::test]
    async fn test_signed_in_remove_failure_changes_nothing() {
        let (store, _, service, cache) = store_with(FakeIdentity::signed_in(), FakeService::default());
        store.add(&sample()).await.unwrap();
        let cache_before = cache.get(KEY).unwrap();

        service.fail_writes.store(true, Ordering::SeqCst);
        let err = store.remove(&sample()).await.unwrap_err();

        assert!(matches!(err, OneHackError::BookmarkWrite(_)));
        assert!(store.is_bookmarked(&sample()));
        assert_eq!(cache.get(KEY).unwrap(), cache_before);
    }

    #[tokio::test]
    async fn test_signed_in_add_and_remove_reach_remote() {
        let (store, _, service, cache) = store_with(FakeIdentity::signed_in(), FakeService::default());

        store.add(&sample()).await.unwrap();
        assert!(store.is_bookmarked(&sample()));
        assert_eq!(cached(&cache).unwrap(), vec![sample()]);
        assert_eq!(service.saved.lock().unwrap().len(), 1);

        store.remove(&sample()).await.unwrap();
        assert!(!store.is_bookmarked(&sample()));
        assert!(service.saved.lock().unwrap().is_empty());
        assert_eq!(service.write_calls(), 2);
    }

    #[tokio::test]
    async fn test_signed_in_add_requires_id() {
        let (store, _, service, _) = store_with(FakeIdentity::signed_in(), FakeService::default());
        let legacy = record(None, "Legacy", "2024-01-01", "2024-01-02");

        let err = store.add(&legacy).await.unwrap_err();

        assert!(matches!(err, OneHackError::MissingId(_)));
        assert_eq!(service.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_second_toggle_rejected_while_first_in_flight() {
        let gate = Arc::new(Notify::new());
        let service = FakeService {
            write_gate: Some(gate.clone()),
            ..FakeService::default()
        };
        let (store, _, service, _) = store_with(FakeIdentity::signed_in(), service);

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.toggle(&sample()).await })
        };
        while !store.syncing() {
            tokio::task::yield_now().await;
        }

        let second = store.toggle(&sample()).await;
        assert!(matches!(second, Err(OneHackError::OperationPending(_))));

        gate.notify_one();
        assert!(first.await.unwrap().unwrap());
        assert!(store.is_bookmarked(&sample()));
        assert_eq!(service.write_calls(), 1);
        assert!(!store.syncing());
    }

    #[tokio::test]
    async fn test_id_less_copy_shares_pending_guard() {
        let gate = Arc::new(Notify::new());
        let service = FakeService {
            write_gate: Some(gate.clone()),
            ..FakeService::default()
        };
        let (store, _, service, _) = store_with(FakeIdentity::signed_in(), service);
        let legacy_copy = record(None, "A", "2025-01-01", "2025-01-02");

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.add(&sample()).await })
        };
        while service.write_calls() == 0 {
            tokio::task::yield_now().await;
        }

        let second = store.remove(&legacy_copy).await;
        assert!(matches!(second, Err(OneHackError::OperationPending(_))));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(store.is_bookmarked(&legacy_copy));
        assert_eq!(service.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let gate = Arc::new(Notify::new());
        let service = FakeService {
            list_gate: Some(gate.clone()),
            ..FakeService::default()
        };
        let (store, _, service, _) = store_with(FakeIdentity::signed_in(), service);

        let load = {
            let store = store.clone();
            tokio::spawn(async move { store.try_load().await })
        };
        while service.list_calls() == 0 {
            tokio::task::yield_now().await;
        }

        // The remote snapshot was taken before this write landed
        store.add(&sample()).await.unwrap();
        service.saved.lock().unwrap().clear();
        gate.notify_one();
        load.await.unwrap().unwrap();

        assert_eq!(store.entries(), vec![sample()]);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (store, _, _, _) = store_with(FakeIdentity::signed_out(), FakeService::default());
        let mut rx = store.subscribe();

        store.add(&sample()).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_runs_on_interval_until_signed_out() {
        let (store, identity, service, _) =
            store_with(FakeIdentity::signed_in(), FakeService::default());

        let handle = store.spawn_refresh(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(301)).await;
        assert_eq!(service.list_calls(), 2);

        identity.sign_out();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert!(handle.is_finished());
        assert_eq!(service.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_resolves_after_sign_out() {
        let (store, identity, _, _) = store_with(FakeIdentity::signed_in(), FakeService::default());

        let mut handle = store.spawn_refresh(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(1)).await;
        identity.sign_out();

        tokio::time::timeout(Duration::from_secs(600), handle.finished())
            .await
            .unwrap();
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_refresh() {
        let (store, _, service, _) = store_with(FakeIdentity::signed_in(), FakeService::default());

        let handle = store.spawn_refresh(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(service.list_calls(), 1);

        handle.stop();
        tokio::time::sleep(Duration::from_secs(900)).await;

        assert_eq!(service.list_calls(), 1);
    }
}
