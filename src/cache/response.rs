//! Time-boxed memoization of cascade responses.
//!
//! Keyed by the canonical serialization of the seven resolved request
//! parameters, so reopening a panel with an identical partial selection does
//! not re-issue the network call. Entries are never served past their expiry;
//! expired entries are evicted lazily on lookup. Concurrent callers for the
//! same key share one in-flight future instead of issuing duplicate calls.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::FutureExt;
use futures::future::Shared;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::types::OptionSets;

/// A failed fetch yields `None`; failures are never cached.
type FetchResult = Option<OptionSets>;
type SharedFetch = Shared<Pin<Box<dyn Future<Output = FetchResult> + Send>>>;

struct CacheEntry {
    value: OptionSets,
    expires_at: Instant,
}

/// TTL-bounded response cache with in-flight deduplication.
///
/// A TTL of zero disables storage entirely (the uncached live-preview
/// policy); deduplication of concurrent identical requests applies either
/// way.
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Cached value for `key`, unless absent or expired.
    pub fn get(&self, key: &str) -> Option<OptionSets> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under `key`. No-op when the TTL is zero.
    pub fn put(&self, key: &str, value: OptionSets) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.lock().insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every stored entry. In-flight fetches are unaffected.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Return the cached value for `key`, or run `fetch` to produce one.
    ///
    /// If another fetch for the same key is already outstanding, this awaits
    /// the same shared future rather than calling `fetch` — exactly one
    /// network call happens per key at a time. Successful results are stored
    /// under the TTL policy; a `None` result is passed through uncached.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult> + Send + 'static,
    {
        if let Some(hit) = self.get(key) {
            return Some(hit);
        }

        let (shared, is_owner) = {
            let mut in_flight = self.in_flight.lock();
            if let Some(existing) = in_flight.get(key) {
                (existing.clone(), false)
            } else {
                let boxed: Pin<Box<dyn Future<Output = FetchResult> + Send>> =
                    Box::pin(fetch());
                let shared = boxed.shared();
                in_flight.insert(key.to_string(), shared.clone());
                (shared, true)
            }
        };

        let result = shared.await;

        // Only the caller that registered the fetch tears it down and stores
        // the result; late joiners just consume the shared value.
        if is_owner {
            self.in_flight.lock().remove(key);
            if let Some(value) = &result {
                self.put(key, value.clone());
            }
        }

        result
    }
}
