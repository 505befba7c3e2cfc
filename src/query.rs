//! Key-based query cache.
//!
//! Results are cached per `(query name, parameters)`. A result younger than the
//! staleness window is served without touching the network; concurrent requests
//! for the same key share one in-flight future; failed fetches are retried
//! according to the query's options before the error is handed to every waiter.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::{ApiError, QueryError};

type Erased = Arc<dyn Any + Send + Sync>;
type InFlight = Shared<BoxFuture<'static, Result<Erased, QueryError>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    name: &'static str,
    params: Vec<(&'static str, String)>,
}

impl QueryKey {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            let rendered: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "({})", rendered.join(","))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDelay {
    /// `min(1s * 2^attempt, 30s)`
    Exponential,
    Fixed(Duration),
}

impl RetryDelay {
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            RetryDelay::Exponential => {
                let millis = 1000u64.saturating_mul(1u64 << attempt.min(16));
                Duration::from_millis(millis.min(30_000))
            }
            RetryDelay::Fixed(delay) => *delay,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Automatic retries after the first failed attempt.
    pub retry: u32,
    pub retry_delay: RetryDelay,
    /// Overrides the client's staleness window.
    pub stale_time: Option<Duration>,
    pub refetch_on_window_focus: bool,
    pub refetch_on_reconnect: bool,
    /// When false, a failure with nothing cached is kept until `invalidate`.
    pub refetch_on_error: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            retry: 1,
            retry_delay: RetryDelay::Exponential,
            stale_time: None,
            refetch_on_window_focus: false,
            refetch_on_reconnect: true,
            refetch_on_error: true,
        }
    }
}

impl QueryOptions {
    /// For non-idempotent requests (POST simulations): one attempt, and the
    /// outcome is only re-sent after an explicit `invalidate`.
    pub fn mutation() -> Self {
        QueryOptions {
            retry: 0,
            retry_delay: RetryDelay::Exponential,
            stale_time: Some(Duration::MAX),
            refetch_on_window_focus: false,
            refetch_on_reconnect: false,
            refetch_on_error: false,
        }
    }

    pub fn with_retry(mut self, retry: u32, delay: RetryDelay) -> Self {
        self.retry = retry;
        self.retry_delay = delay;
        self
    }

    pub fn refetch_on_window_focus(mut self, enabled: bool) -> Self {
        self.refetch_on_window_focus = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchTrigger {
    WindowFocus,
    Reconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Fresh,
    Stale,
    Fetching,
}

struct Entry {
    value: Option<Erased>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<InFlight>,
    last_error: Option<QueryError>,
    options: QueryOptions,
}

impl Entry {
    fn new(options: QueryOptions) -> Self {
        Self {
            value: None,
            fetched_at: None,
            invalidated: false,
            in_flight: None,
            last_error: None,
            options,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        match (&self.value, self.fetched_at) {
            (Some(_), Some(at)) => !self.invalidated && at.elapsed() < stale_time,
            _ => false,
        }
    }
}

type Entries = Arc<Mutex<HashMap<QueryKey, Entry>>>;

/// Shared query cache. Cloning hands out another handle to the same cache.
#[derive(Clone)]
pub struct QueryClient {
    entries: Entries,
    stale_time: Duration,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Return the cached value for `key` when fresh, otherwise run (or join) a fetch.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let in_flight = {
            let mut entries = self.entries.lock().await;
            let stale_time = options.stale_time.unwrap_or(self.stale_time);
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(options.clone()));
            entry.options = options.clone();

            if entry.is_fresh(stale_time) {
                if let Some(value) = entry.value.clone() {
                    if let Ok(typed) = value.downcast::<T>() {
                        tracing::debug!("Query cache hit: {}", key);
                        return Ok(typed);
                    }
                }
            }

            if !entry.options.refetch_on_error
                && entry.in_flight.is_none()
                && entry.value.is_none()
                && !entry.invalidated
            {
                if let Some(e) = entry.last_error.clone() {
                    tracing::debug!("Query {} keeps its last failure", key);
                    return Err(e);
                }
            }

            match entry.in_flight.clone() {
                Some(existing) => {
                    tracing::debug!("Joining in-flight query: {}", key);
                    existing
                }
                None => {
                    tracing::debug!("Query cache miss: {}", key);
                    let fut = Self::run(self.entries.clone(), key.clone(), options, fetcher)
                        .boxed()
                        .shared();
                    entry.in_flight = Some(fut.clone());
                    fut
                }
            }
        };

        let erased = in_flight.await?;
        erased.downcast::<T>().map_err(|_| QueryError {
            key: key.to_string(),
            attempts: 0,
            source: Arc::new(ApiError::Setup(format!(
                "query {} is cached with a different payload type",
                key
            ))),
        })
    }

    async fn run<T, F, Fut>(
        entries: Entries,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<Erased, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut attempt = 0;
        let outcome = loop {
            match fetcher().await {
                Ok(value) => break Ok(Arc::new(value) as Erased),
                Err(e) if attempt < options.retry => {
                    let delay = options.retry_delay.delay(attempt);
                    tracing::warn!(
                        "Query {} failed (attempt {}), retrying in {:?}: {}",
                        key,
                        attempt + 1,
                        delay,
                        e
                    );
                    attempt += 1;
                    sleep(delay).await;
                }
                Err(e) => {
                    break Err(QueryError {
                        key: key.to_string(),
                        attempts: attempt + 1,
                        source: Arc::new(e),
                    })
                }
            }
        };

        let mut guard = entries.lock().await;
        if let Some(entry) = guard.get_mut(&key) {
            entry.in_flight = None;
            match &outcome {
                Ok(value) => {
                    entry.value = Some(value.clone());
                    entry.fetched_at = Some(Instant::now());
                    entry.invalidated = false;
                    entry.last_error = None;
                }
                Err(e) => {
                    tracing::warn!("Query {} failed after {} attempt(s)", key, e.attempts);
                    entry.last_error = Some(e.clone());
                    if !entry.options.refetch_on_error {
                        entry.invalidated = false;
                    }
                }
            }
        }
        outcome
    }

    /// Last successful value for `key`, fresh or not.
    pub async fn cached<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .and_then(|entry| entry.value.clone())
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub async fn last_error(&self, key: &QueryKey) -> Option<QueryError> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|entry| entry.last_error.clone())
    }

    pub async fn status(&self, key: &QueryKey) -> CacheStatus {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => CacheStatus::Empty,
            Some(entry) if entry.in_flight.is_some() => CacheStatus::Fetching,
            Some(entry) if entry.value.is_none() => CacheStatus::Empty,
            Some(entry) => {
                let stale_time = entry.options.stale_time.unwrap_or(self.stale_time);
                if entry.is_fresh(stale_time) {
                    CacheStatus::Fresh
                } else {
                    CacheStatus::Stale
                }
            }
        }
    }

    /// Mark `key` stale so the next fetch goes to the network.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        for entry in entries.values_mut() {
            entry.invalidated = true;
        }
    }

    /// Apply a focus/reconnect event. Returns the keys that will refetch on next use.
    pub async fn notify(&self, trigger: RefetchTrigger) -> Vec<QueryKey> {
        let mut entries = self.entries.lock().await;
        let mut marked = Vec::new();
        for (key, entry) in entries.iter_mut() {
            let wants = match trigger {
                RefetchTrigger::WindowFocus => entry.options.refetch_on_window_focus,
                RefetchTrigger::Reconnect => entry.options.refetch_on_reconnect,
            };
            if wants && entry.value.is_some() {
                entry.invalidated = true;
                marked.push(key.clone());
            }
        }
        tracing::debug!("{:?}: {} queries marked for refetch", trigger, marked.len());
        marked
    }
}
