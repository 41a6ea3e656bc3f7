//! TTL cache — expiry metadata layered over a [`KvStore`].
//!
//! Every value is persisted inside a [`CacheEnvelope`] carrying its expiry
//! time. Reads prune lazily: an expired envelope is physically removed from
//! the store before the read reports a miss, so a stale value never
//! surfaces.
//!
//! The cache is best-effort. Storage failures are logged and treated as a
//! miss (reads) or a dropped write (writes); they never reach the caller.
//!
//! The TTL belongs to the instance, not the mechanism. The session keeps a
//! long-lived history cache (3 days by default) and the fetcher a short-lived
//! response cache (60 s by default) over the same store.

use crate::clock::{Clock, SystemClock};
use crate::store::KvStore;
use crate::types::Timestamp;
use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// A stored value wrapped with its expiry. `expire_at == None` marks an
/// envelope that holds nothing valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEnvelope<T> {
    pub data: T,
    pub expire_at: Option<Timestamp>,
}

impl<T> CacheEnvelope<T> {
    /// Live at `now`. An envelope expiring exactly at `now` is still live.
    pub fn is_live(&self, now: Timestamp) -> bool {
        matches!(self.expire_at, Some(at) if now <= at)
    }
}

/// The expiry half of an envelope, readable whatever `data` holds.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpiryHeader {
    expire_at: Option<Timestamp>,
}

/// Result of inspecting one key.
enum Probe<T> {
    Live(T),
    Gone,
}

pub struct TtlCache<T> {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    _marker: PhantomData<fn() -> T>,
}

// Manual impl: `T` itself need not be `Clone`.
impl<T> Clone for TtlCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("ttl", &self.ttl).finish()
    }
}

impl<T> TtlCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self::with_clock(store, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KvStore>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            ttl,
            _marker: PhantomData,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Store `value` under `key`, expiring `ttl` from now. Overwrites.
    pub fn put(&self, key: &str, value: &T) {
        let envelope = CacheEnvelope {
            data: value,
            expire_at: Some(self.clock.now() + self.ttl),
        };
        let encoded = match serde_json::to_string(&envelope) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache: could not encode value, dropping write");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &encoded) {
            tracing::warn!(key, error = %e, "cache: store write failed, dropping write");
        }
    }

    /// Live value under `key`, pruning it first if it has expired.
    pub fn get(&self, key: &str) -> Option<T> {
        match self.probe(key, self.clock.now()) {
            Probe::Live(value) => Some(value),
            Probe::Gone => None,
        }
    }

    /// Every live value whose key starts with `prefix`, in store enumeration
    /// order. Expired entries met along the way are deleted.
    pub fn list_valid(&self, prefix: &str) -> Vec<T> {
        let now = self.clock.now();
        self.prefixed_keys(prefix)
            .into_iter()
            .filter_map(|key| match self.probe(&key, now) {
                Probe::Live(value) => Some(value),
                Probe::Gone => None,
            })
            .collect()
    }

    /// Delete every live entry under `prefix` whose value satisfies
    /// `predicate`. Returns how many were removed.
    pub fn remove_by_value<P>(&self, prefix: &str, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let now = self.clock.now();
        let mut removed = 0;
        for key in self.prefixed_keys(prefix) {
            if let Probe::Live(value) = self.probe(&key, now) {
                if predicate(&value) {
                    self.remove(&key);
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Delete expired and unreadable entries under `prefix` without decoding
    /// their data, so one cache can sweep keys written by another over the
    /// same store. Returns how many were removed.
    pub fn prune(&self, prefix: &str) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        for key in self.prefixed_keys(prefix) {
            let live = match self.store.get(&key) {
                Ok(Some(raw)) => serde_json::from_str::<ExpiryHeader>(&raw)
                    .is_ok_and(|h| matches!(h.expire_at, Some(at) if now <= at)),
                Ok(None) => true,
                Err(e) => {
                    tracing::warn!(key, error = %e, "cache: store read failed during prune");
                    true
                }
            };
            if !live {
                self.remove(&key);
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(prefix, removed, "cache: expired entries pruned");
        }
        removed
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "cache: store remove failed");
        }
    }

    fn prefixed_keys(&self, prefix: &str) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys.into_iter().filter(|k| k.starts_with(prefix)).collect(),
            Err(e) => {
                tracing::warn!(prefix, error = %e, "cache: key enumeration failed");
                Vec::new()
            }
        }
    }

    fn probe(&self, key: &str, now: Timestamp) -> Probe<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Probe::Gone,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache: store read failed, treating as miss");
                return Probe::Gone;
            }
        };
        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) if envelope.is_live(now) => Probe::Live(envelope.data),
            Ok(_) => {
                tracing::debug!(key, "cache: expired entry pruned");
                self.remove(key);
                Probe::Gone
            }
            Err(e) => {
                // An unreadable envelope can never become valid again.
                tracing::debug!(key, error = %e, "cache: malformed entry pruned");
                self.remove(key);
                Probe::Gone
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
