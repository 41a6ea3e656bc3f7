//! Suggestion fetcher — calls the [`Lookup`] collaborator and hands results
//! back to the session tagged with the ticket they were dispatched under.
//!
//! The fetcher never decides whether a result is stale; it only carries the
//! [`FetchTicket`] through so the session can compare it against live state
//! at apply time. In-flight lookups are never cancelled.
//!
//! Results are capped to the first `max_results` entries in service order.
//! An optional short-lived response cache, keyed by the lookup's request
//! key, short-circuits repeated queries. Expired responses are swept before
//! each write so distinct queries cannot fill the shared store. Writes run
//! on the blocking pool because a file-backed store touches disk.

use crate::cache::TtlCache;
use crate::collab::Lookup;
use crate::error::LookupError;
use crate::types::{FetchTicket, Suggestion};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default cap on surfaced suggestions.
pub const DEFAULT_MAX_RESULTS: usize = 7;

/// A completed lookup, still tagged with its dispatch ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Suggestion>, LookupError>,
}

#[derive(Clone, Debug)]
struct ResponseCache {
    cache: TtlCache<Vec<Suggestion>>,
    prefix: String,
}

#[derive(Clone)]
pub struct SuggestionFetcher {
    lookup: Arc<dyn Lookup>,
    max_results: usize,
    responses: Option<ResponseCache>,
}

impl SuggestionFetcher {
    pub fn new(lookup: Arc<dyn Lookup>, max_results: usize) -> Self {
        Self {
            lookup,
            max_results,
            responses: None,
        }
    }

    /// Serve repeated queries from `cache` while its entries are live.
    pub fn with_response_cache(
        mut self,
        cache: TtlCache<Vec<Suggestion>>,
        prefix: impl Into<String>,
    ) -> Self {
        self.responses = Some(ResponseCache {
            cache,
            prefix: prefix.into(),
        });
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Key prefix of the response cache, if one is attached.
    pub fn response_prefix(&self) -> Option<&str> {
        self.responses.as_ref().map(|r| r.prefix.as_str())
    }

    /// Look up `query`, consulting the response cache first.
    pub async fn fetch(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
        let cache_key = self
            .responses
            .as_ref()
            .map(|r| format!("{}{}", r.prefix, self.lookup.request_key(query)));

        if let (Some(responses), Some(key)) = (&self.responses, &cache_key) {
            if let Some(hit) = responses.cache.get(key) {
                tracing::debug!(query, "fetch: response cache hit");
                return Ok(self.cap(hit));
            }
        }

        tracing::debug!(query, "fetch: calling lookup");
        let response = self.lookup.lookup(query).await?;

        if let (Some(responses), Some(key)) = (&self.responses, cache_key) {
            let responses = responses.clone();
            let entry = response.clone();
            let stored = tokio::task::spawn_blocking(move || {
                responses.cache.prune(&responses.prefix);
                responses.cache.put(&key, &entry);
            })
            .await;
            if let Err(e) = stored {
                tracing::warn!(query, error = %e, "fetch: response cache write failed");
            }
        }
        Ok(self.cap(response))
    }

    /// Run [`fetch`](Self::fetch) on a background task and send the tagged
    /// result to `tx`. A closed receiver means the session is gone; the
    /// result is dropped.
    pub fn dispatch(&self, ticket: FetchTicket, tx: mpsc::UnboundedSender<Fetched>) -> JoinHandle<()> {
        let fetcher = self.clone();
        tracing::debug!(generation = ticket.generation, query = %ticket.query, "fetch: dispatched");
        tokio::spawn(async move {
            let result = fetcher.fetch(&ticket.query).await;
            if tx.send(Fetched { ticket, result }).is_err() {
                tracing::debug!("fetch: session closed before result arrived");
            }
        })
    }

    fn cap(&self, mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        suggestions.truncate(self.max_results);
        suggestions
    }
}

impl std::fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("max_results", &self.max_results)
            .field("responses", &self.responses)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::{KvStore, MemoryStore};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedLookup {
        calls: Mutex<Vec<String>>,
        fail: bool,
        size: usize,
    }

    #[async_trait]
    impl Lookup for ScriptedLookup {
        async fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
            self.calls.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(LookupError::Status {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok((0..self.size)
                .map(|i| Suggestion::new(i.to_string(), format!("{query}{i}")))
                .collect())
        }

        fn request_key(&self, query: &str) -> String {
            format!("/sick?q={query}")
        }
    }

    #[tokio::test]
    async fn caps_results_in_service_order() {
        let lookup = Arc::new(ScriptedLookup { size: 10, ..Default::default() });
        let fetcher = SuggestionFetcher::new(lookup, DEFAULT_MAX_RESULTS);
        let got = fetcher.fetch("암").await.unwrap();
        let labels: Vec<_> = got.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["암0", "암1", "암2", "암3", "암4", "암5", "암6"]);
    }

    #[tokio::test]
    async fn response_cache_short_circuits_until_expiry() {
        let lookup = Arc::new(ScriptedLookup { size: 2, ..Default::default() });
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::with_clock(store.clone(), Duration::seconds(60), clock.clone());
        let fetcher = SuggestionFetcher::new(lookup.clone(), 7).with_response_cache(cache, "resp:");

        fetcher.fetch("암").await.unwrap();
        fetcher.fetch("암").await.unwrap();
        assert_eq!(lookup.calls.lock().unwrap().len(), 1);
        assert_eq!(store.keys().unwrap(), vec!["resp:/sick?q=암".to_string()]);

        clock.advance(Duration::seconds(61));
        fetcher.fetch("암").await.unwrap();
        assert_eq!(lookup.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn writes_sweep_expired_responses() {
        let lookup = Arc::new(ScriptedLookup { size: 1, ..Default::default() });
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::with_clock(store.clone(), Duration::seconds(60), clock.clone());
        let fetcher = SuggestionFetcher::new(lookup, 7).with_response_cache(cache, "resp:");
        store.set("search:history:1-간암", "kept").unwrap();

        for query in ["간", "위", "폐"] {
            fetcher.fetch(query).await.unwrap();
        }
        clock.advance(Duration::seconds(61));
        fetcher.fetch("대장").await.unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec!["resp:/sick?q=대장".to_string(), "search:history:1-간암".to_string()]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn file_backed_responses_are_written_and_swept() {
        use crate::store::FileStore;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(FileStore::open(&path, None).unwrap());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::with_clock(store.clone(), Duration::seconds(60), clock.clone());
        let lookup = Arc::new(ScriptedLookup { size: 1, ..Default::default() });
        let fetcher = SuggestionFetcher::new(lookup, 7).with_response_cache(cache, "resp:");

        fetcher.fetch("간").await.unwrap();
        clock.advance(Duration::seconds(61));
        fetcher.fetch("위").await.unwrap();

        let reopened = FileStore::open(&path, None).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["resp:/sick?q=위".to_string()]);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let lookup = Arc::new(ScriptedLookup { fail: true, ..Default::default() });
        let store = Arc::new(MemoryStore::new());
        let cache = TtlCache::new(store.clone(), Duration::seconds(60));
        let fetcher = SuggestionFetcher::new(lookup, 7).with_response_cache(cache, "resp:");

        let err = fetcher.fetch("암").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 503, .. }));
        assert!(store.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_returns_ticket_with_result() {
        let lookup = Arc::new(ScriptedLookup { size: 1, ..Default::default() });
        let fetcher = SuggestionFetcher::new(lookup, 7);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = FetchTicket { generation: 4, query: "간".into() };

        fetcher.dispatch(ticket.clone(), tx).await.unwrap();
        let fetched = rx.recv().await.unwrap();
        assert_eq!(fetched.ticket, ticket);
        assert_eq!(fetched.result, Ok(vec![Suggestion::new("0", "간0")]));
    }
}
