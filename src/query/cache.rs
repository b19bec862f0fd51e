//! Process-wide cache for server state.
//!
//! Pages read through [`QueryObserver`] handles obtained from
//! [`QueryClient::observe`]. Observers naming the same [`QueryKey`] share
//! one entry, so concurrent observations coalesce into a single request.
//! Writers invalidate keys instead of touching entries directly; an
//! invalidated entry refetches immediately when observed and lazily
//! otherwise.
//!
//! Every issued fetch carries the entry's sequence number at issue time.
//! A completion is applied only when its number still matches, which
//! keeps the newest issued fetch authoritative no matter how the
//! underlying requests finish.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::query::key::{KeyFilter, QueryKey};

type ErasedValue = Arc<dyn Any + Send + Sync>;
type FetchFuture = Pin<Box<dyn Future<Output = Result<ErasedValue, String>> + Send>>;
type Fetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data yet; a fetch may or may not be running.
    Pending,
    /// Last fetch succeeded and `data` holds its result.
    Success,
    /// Last fetch failed and `error` holds the message.
    Error,
}

/// Per-observer knobs, resolved at observation time.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Age at which cached data stops satisfying an observation.
    /// [`Duration::ZERO`] means always refetch, [`Duration::MAX`] means
    /// cached data never expires on its own.
    pub stale_time: Duration,
    /// Disabled observers read the cache but never trigger fetches.
    pub enabled: bool,
    /// Whether [`QueryClient::notify_focus`] may refetch for this observer.
    pub refetch_on_focus: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            enabled: true,
            refetch_on_focus: true,
        }
    }
}

impl QueryOptions {
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Cached data never goes stale by age.
    pub fn never_stale(mut self) -> Self {
        self.stale_time = Duration::MAX;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn refetch_on_focus(mut self, refetch: bool) -> Self {
        self.refetch_on_focus = refetch;
        self
    }
}

/// Immutable view of one entry, typed for the observer that asked.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    /// Present exactly when `status` is [`QueryStatus::Success`].
    pub data: Option<Arc<T>>,
    /// Present exactly when `status` is [`QueryStatus::Error`].
    pub error: Option<String>,
    /// A request for this entry is currently running.
    pub is_fetching: bool,
}

impl<T> QuerySnapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

struct Registration {
    id: u64,
    enabled: bool,
    stale_time: Duration,
    refetch_on_focus: bool,
}

struct Entry {
    status: QueryStatus,
    data: Option<ErasedValue>,
    error: Option<String>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    inflight: bool,
    fetch_seq: u64,
    fetcher: Option<Fetcher>,
    observers: Vec<Registration>,
}

impl Entry {
    fn new() -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            fetched_at: None,
            invalidated: false,
            inflight: false,
            fetch_seq: 0,
            fetcher: None,
            observers: Vec::new(),
        }
    }

    fn time_stale(&self, stale_time: Duration) -> bool {
        if stale_time == Duration::MAX {
            return false;
        }
        match self.fetched_at {
            Some(at) => at.elapsed() >= stale_time,
            None => true,
        }
    }

    /// Would this observation trigger a fetch right now?
    fn wants_fetch(&self, reg: &Registration) -> bool {
        if !reg.enabled || self.inflight {
            return false;
        }
        match self.status {
            QueryStatus::Pending | QueryStatus::Error => true,
            QueryStatus::Success => self.invalidated || self.time_stale(reg.stale_time),
        }
    }

    fn has_enabled_observer(&self) -> bool {
        self.observers.iter().any(|reg| reg.enabled)
    }

    /// Move to Pending and hand back the fetcher plus the new sequence
    /// number. Data and error are cleared: an entry holds data only
    /// while its status is Success.
    fn issue(&mut self) -> Option<(Fetcher, u64)> {
        let fetcher = self.fetcher.clone()?;
        self.fetch_seq += 1;
        self.status = QueryStatus::Pending;
        self.data = None;
        self.error = None;
        self.invalidated = false;
        self.inflight = true;
        Some((fetcher, self.fetch_seq))
    }

    fn reset(&mut self) {
        self.fetch_seq += 1;
        self.status = QueryStatus::Pending;
        self.data = None;
        self.error = None;
        self.fetched_at = None;
        self.invalidated = false;
        self.inflight = false;
    }
}

struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    next_observer: u64,
}

struct ClientInner {
    state: Mutex<CacheState>,
    /// Bumped on every state change; observers wait on it.
    version: watch::Sender<u64>,
}

/// Handle to the shared cache. Cheap to clone.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<ClientInner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(ClientInner {
                state: Mutex::new(CacheState {
                    entries: HashMap::new(),
                    next_observer: 0,
                }),
                version,
            }),
        }
    }

    /// Register an observer for `key`, fetching via `fetcher` whenever
    /// the entry needs data. The fetch runs at most once no matter how
    /// many observers ask concurrently.
    ///
    /// All observers of one key must use the same value type `T`;
    /// snapshots surface a type mismatch as an error instead of data.
    pub fn observe<T, E, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> QueryObserver<T>
    where
        T: Send + Sync + 'static,
        E: fmt::Display,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let stored: Fetcher = Arc::new(move || {
            let fut = fetcher();
            Box::pin(async move {
                fut.await
                    .map(|value| Arc::new(value) as ErasedValue)
                    .map_err(|e| e.to_string())
            })
        });

        let version = self.inner.version.subscribe();
        let mut to_spawn = None;
        let id;
        {
            let mut state = self.inner.state.lock();
            id = state.next_observer;
            state.next_observer += 1;

            let entry = state.entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.fetcher = Some(stored);
            let reg = Registration {
                id,
                enabled: options.enabled,
                stale_time: options.stale_time,
                refetch_on_focus: options.refetch_on_focus,
            };
            if entry.wants_fetch(&reg) {
                to_spawn = entry.issue().map(|(f, seq)| (key.clone(), f, seq));
            }
            entry.observers.push(reg);
        }
        self.bump();
        if let Some((key, fetcher, seq)) = to_spawn {
            self.spawn_fetch(key, fetcher, seq);
        }

        QueryObserver {
            client: self.clone(),
            key,
            id,
            version,
            _marker: PhantomData,
        }
    }

    /// Mark every entry matching one of `filters` stale. Entries with an
    /// enabled observer refetch immediately; the rest refetch on their
    /// next observation. A fetch already in flight is superseded, not
    /// awaited: its result will be discarded in favor of the new one.
    pub fn invalidate(&self, filters: &[KeyFilter]) {
        let mut to_spawn = Vec::new();
        {
            let mut state = self.inner.state.lock();
            for (key, entry) in state.entries.iter_mut() {
                if !filters.iter().any(|f| f.matches(key)) {
                    continue;
                }
                entry.invalidated = true;
                tracing::debug!(key = %key, "invalidated");
                if entry.has_enabled_observer() {
                    if let Some((fetcher, seq)) = entry.issue() {
                        to_spawn.push((key.clone(), fetcher, seq));
                    }
                }
            }
        }
        self.bump();
        for (key, fetcher, seq) in to_spawn {
            self.spawn_fetch(key, fetcher, seq);
        }
    }

    /// The window regained focus: refetch entries that are stale for at
    /// least one enabled observer which opted into focus refetching.
    pub fn notify_focus(&self) {
        let mut to_spawn = Vec::new();
        {
            let mut state = self.inner.state.lock();
            for (key, entry) in state.entries.iter_mut() {
                let wants = entry
                    .observers
                    .iter()
                    .any(|reg| reg.refetch_on_focus && entry.wants_fetch(reg));
                if wants {
                    if let Some((fetcher, seq)) = entry.issue() {
                        to_spawn.push((key.clone(), fetcher, seq));
                    }
                }
            }
        }
        self.bump();
        for (key, fetcher, seq) in to_spawn {
            self.spawn_fetch(key, fetcher, seq);
        }
    }

    /// Drop all cached data. Entries nobody observes are removed;
    /// observed entries reset to Pending and refetch for their enabled
    /// observers. In-flight results from before the clear are discarded.
    pub fn clear(&self) {
        let mut to_spawn = Vec::new();
        {
            let mut state = self.inner.state.lock();
            state.entries.retain(|_, entry| !entry.observers.is_empty());
            for (key, entry) in state.entries.iter_mut() {
                entry.reset();
                if entry.has_enabled_observer() {
                    if let Some((fetcher, seq)) = entry.issue() {
                        to_spawn.push((key.clone(), fetcher, seq));
                    }
                }
            }
        }
        self.bump();
        for (key, fetcher, seq) in to_spawn {
            self.spawn_fetch(key, fetcher, seq);
        }
    }

    /// Number of entries currently tracked.
    pub fn entry_count(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    fn force_fetch(&self, key: &QueryKey) {
        let mut to_spawn = None;
        {
            let mut state = self.inner.state.lock();
            if let Some(entry) = state.entries.get_mut(key) {
                to_spawn = entry.issue().map(|(f, seq)| (key.clone(), f, seq));
            }
        }
        self.bump();
        if let Some((key, fetcher, seq)) = to_spawn {
            self.spawn_fetch(key, fetcher, seq);
        }
    }

    fn spawn_fetch(&self, key: QueryKey, fetcher: Fetcher, seq: u64) {
        let client = self.clone();
        tokio::spawn(async move {
            let result = fetcher().await;
            client.complete(&key, seq, result);
        });
    }

    /// Apply a fetch result, unless a newer fetch was issued meanwhile.
    fn complete(&self, key: &QueryKey, seq: u64, result: Result<ErasedValue, String>) {
        {
            let mut state = self.inner.state.lock();
            let Some(entry) = state.entries.get_mut(key) else {
                return;
            };
            if entry.fetch_seq != seq {
                tracing::debug!(key = %key, seq, "discarding superseded fetch result");
                return;
            }
            entry.inflight = false;
            match result {
                Ok(data) => {
                    entry.status = QueryStatus::Success;
                    entry.data = Some(data);
                    entry.error = None;
                    entry.fetched_at = Some(Instant::now());
                    entry.invalidated = false;
                }
                Err(message) => {
                    tracing::warn!(key = %key, error = %message, "fetch failed");
                    entry.status = QueryStatus::Error;
                    entry.data = None;
                    entry.error = Some(message);
                }
            }
        }
        self.bump();
    }

    fn snapshot_for<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QuerySnapshot<T> {
        let state = self.inner.state.lock();
        let Some(entry) = state.entries.get(key) else {
            return QuerySnapshot {
                status: QueryStatus::Pending,
                data: None,
                error: None,
                is_fetching: false,
            };
        };
        let data = match entry.data.clone() {
            Some(erased) => match erased.downcast::<T>() {
                Ok(typed) => Some(typed),
                Err(_) => {
                    tracing::error!(key = %key, "cached value has unexpected type");
                    return QuerySnapshot {
                        status: QueryStatus::Error,
                        data: None,
                        error: Some("cached value has unexpected type".to_string()),
                        is_fetching: entry.inflight,
                    };
                }
            },
            None => None,
        };
        QuerySnapshot {
            status: entry.status,
            data,
            error: entry.error.clone(),
            is_fetching: entry.inflight,
        }
    }

    fn set_enabled(&self, key: &QueryKey, id: u64, enabled: bool) {
        let mut to_spawn = None;
        {
            let mut state = self.inner.state.lock();
            let Some(entry) = state.entries.get_mut(key) else {
                return;
            };
            let Some(pos) = entry.observers.iter().position(|reg| reg.id == id) else {
                return;
            };
            entry.observers[pos].enabled = enabled;
            if enabled && entry.wants_fetch(&entry.observers[pos]) {
                to_spawn = entry.issue().map(|(f, seq)| (key.clone(), f, seq));
            }
        }
        self.bump();
        if let Some((key, fetcher, seq)) = to_spawn {
            self.spawn_fetch(key, fetcher, seq);
        }
    }

    fn unregister(&self, key: &QueryKey, id: u64) {
        {
            let mut state = self.inner.state.lock();
            let Some(entry) = state.entries.get_mut(key) else {
                return;
            };
            entry.observers.retain(|reg| reg.id != id);
            // Nobody is waiting for an in-flight result anymore; bump the
            // sequence so it is discarded instead of stored.
            if entry.observers.is_empty() && entry.inflight {
                entry.fetch_seq += 1;
                entry.inflight = false;
            }
        }
        self.bump();
    }

    fn bump(&self) {
        self.inner.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

/// One registered observation of a key. Dropping it unregisters.
pub struct QueryObserver<T> {
    client: QueryClient,
    key: QueryKey,
    id: u64,
    version: watch::Receiver<u64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current view of the entry.
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.client.snapshot_for(&self.key)
    }

    /// Wait until the entry settles into Success or Error and return the
    /// snapshot. A disabled observer on an unfetched entry waits until
    /// something else triggers the fetch.
    pub async fn ready(&mut self) -> QuerySnapshot<T> {
        loop {
            let snap = self.snapshot();
            if snap.status != QueryStatus::Pending {
                return snap;
            }
            if self.version.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }

    /// Force a fetch now, regardless of staleness. Supersedes any fetch
    /// already in flight.
    pub fn refetch(&self) {
        self.client.force_fetch(&self.key);
    }

    /// Enable or disable this observation. Enabling triggers a fetch if
    /// the entry is stale for this observer.
    pub fn set_enabled(&self, enabled: bool) {
        self.client.set_enabled(&self.key, self.id, enabled);
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.client.unregister(&self.key, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        counter: Arc<AtomicUsize>,
        value: &'static str,
    ) -> impl Fn() -> Pin<Box<dyn Future<Output = Result<String, String>> + Send>> + Send + Sync
    {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let value = value.to_string();
            Box::pin(async move { Ok(value) })
        }
    }

    #[tokio::test]
    async fn first_observation_fetches_once() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut obs = client.observe::<String, _, _, _>(
            QueryKey::root("/api/news"),
            QueryOptions::default(),
            counting_fetcher(calls.clone(), "data"),
        );

        let snap = obs.ready().await;
        assert!(snap.is_success());
        assert_eq!(snap.data.as_deref(), Some(&"data".to_string()));
        assert_eq!(snap.error, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_time_zero_refetches_per_observation() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::root("/api/news");

        let mut obs = client.observe::<String, _, _, _>(
            key.clone(),
            QueryOptions::default(),
            counting_fetcher(calls.clone(), "one"),
        );
        obs.ready().await;
        drop(obs);

        let mut obs = client.observe::<String, _, _, _>(
            key,
            QueryOptions::default(),
            counting_fetcher(calls.clone(), "two"),
        );
        let snap = obs.ready().await;
        assert_eq!(snap.data.as_deref(), Some(&"two".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn never_stale_data_is_served_from_cache() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::root("/api/history");
        let options = QueryOptions::default().never_stale();

        let mut obs = client.observe::<String, _, _, _>(
            key.clone(),
            options.clone(),
            counting_fetcher(calls.clone(), "then"),
        );
        obs.ready().await;
        drop(obs);

        let mut obs = client.observe::<String, _, _, _>(
            key,
            options,
            counting_fetcher(calls.clone(), "now"),
        );
        let snap = obs.ready().await;
        assert_eq!(snap.data.as_deref(), Some(&"then".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_observer_never_triggers_a_fetch() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let obs = client.observe::<String, _, _, _>(
            QueryKey::root("/api/media"),
            QueryOptions::default().enabled(false),
            counting_fetcher(calls.clone(), "data"),
        );

        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(obs.snapshot().is_loading());

        obs.set_enabled(true);
        let mut obs = obs;
        let snap = obs.ready().await;
        assert!(snap.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_the_message() {
        let client = QueryClient::new();
        let mut obs = client.observe::<String, _, _, _>(
            QueryKey::root("/api/news"),
            QueryOptions::default(),
            || Box::pin(async { Err::<String, String>("boom".to_string()) }),
        );

        let snap = obs.ready().await;
        assert!(snap.is_error());
        assert_eq!(snap.data, None);
        assert_eq!(snap.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn type_mismatch_is_surfaced_not_served() {
        let client = QueryClient::new();
        let key = QueryKey::root("/api/news");
        let mut strings = client.observe::<String, _, _, _>(
            key.clone(),
            QueryOptions::default().never_stale(),
            || Box::pin(async { Ok::<_, String>("text".to_string()) }),
        );
        strings.ready().await;

        let numbers = client.observe::<i64, _, _, _>(
            key,
            QueryOptions::default().never_stale(),
            || Box::pin(async { Ok::<_, String>(7i64) }),
        );
        let snap = numbers.snapshot();
        assert!(snap.is_error());
        assert_eq!(snap.data, None);
        assert_eq!(snap.error.as_deref(), Some("cached value has unexpected type"));
    }

    #[tokio::test]
    async fn invalidate_without_observers_waits_for_next_observation() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::root("/api/coaches");

        let mut obs = client.observe::<String, _, _, _>(
            key.clone(),
            QueryOptions::default().never_stale(),
            counting_fetcher(calls.clone(), "one"),
        );
        obs.ready().await;
        drop(obs);

        client.invalidate(&[KeyFilter::prefix(key.clone())]);
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let mut obs = client.observe::<String, _, _, _>(
            key,
            QueryOptions::default().never_stale(),
            counting_fetcher(calls.clone(), "two"),
        );
        let snap = obs.ready().await;
        assert_eq!(snap.data.as_deref(), Some(&"two".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refetch_fetches_again_within_fresh_window() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch_calls = calls.clone();
        let mut obs = client.observe::<String, _, _, _>(
            QueryKey::root("/api/standings"),
            QueryOptions::default().never_stale(),
            move || {
                let n = fetch_calls.fetch_add(1, Ordering::SeqCst) + 1;
                Box::pin(async move { Ok::<_, String>(format!("v{n}")) })
            },
        );

        let snap = obs.ready().await;
        assert_eq!(snap.data.as_deref(), Some(&"v1".to_string()));

        obs.refetch();
        let snap = obs.ready().await;
        assert_eq!(snap.data.as_deref(), Some(&"v2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refetch_supersedes_an_inflight_fetch() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = watch::channel(false);

        let fetch_calls = calls.clone();
        let mut obs = client.observe::<String, _, _, _>(
            QueryKey::root("/api/matches"),
            QueryOptions::default().never_stale(),
            move || {
                let n = fetch_calls.fetch_add(1, Ordering::SeqCst) + 1;
                let mut gate = gate.clone();
                Box::pin(async move {
                    if n == 1 {
                        // The first request parks until released below.
                        while !*gate.borrow_and_update() {
                            if gate.changed().await.is_err() {
                                break;
                            }
                        }
                        Ok::<_, String>("slow".to_string())
                    } else {
                        Ok("fast".to_string())
                    }
                })
            },
        );

        // Let the first fetch start and park.
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(obs.snapshot().is_loading());

        obs.refetch();
        let snap = obs.ready().await;
        assert_eq!(snap.data.as_deref(), Some(&"fast".to_string()));

        // The parked result lands afterwards; it must be discarded.
        release.send(true).expect("Should release the parked fetch");
        tokio::task::yield_now().await;
        let snap = obs.snapshot();
        assert_eq!(snap.data.as_deref(), Some(&"fast".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
