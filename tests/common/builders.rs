//! Test builders — a fully wired [`SearchSession`] plus handles on every
//! collaborator, so harnesses can drive the session and inspect the edges.

use super::fake_lookup::{FakeLookup, Recorder};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use typeahead_core::clock::ManualClock;
use typeahead_core::{
    KvStore, Lookup, MemoryStore, SearchSession, SessionOptions, SuggestionFetcher, TtlCache,
};

pub const HISTORY_PREFIX: &str = "search:history:";
pub const RESPONSE_PREFIX: &str = "search:response:";

pub struct Harness {
    pub session: SearchSession,
    pub lookup: Arc<FakeLookup>,
    pub recorder: Arc<Recorder>,
    pub store: Arc<dyn KvStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    /// Keys currently in the store under the history prefix.
    pub fn history_keys(&self) -> Vec<String> {
        self.store
            .keys()
            .unwrap()
            .into_iter()
            .filter(|k| k.starts_with(HISTORY_PREFIX))
            .collect()
    }
}

/// Fluent builder for [`Harness`].
///
/// ```rust,ignore
/// let mut h = SessionBuilder::new().debounce_ms(50).response_cache(chrono::Duration::seconds(60)).build();
/// ```
pub struct SessionBuilder {
    debounce: Duration,
    max_results: usize,
    history_ttl: chrono::Duration,
    response_ttl: Option<chrono::Duration>,
    store: Arc<dyn KvStore>,
    lookup: Arc<FakeLookup>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            max_results: 7,
            history_ttl: chrono::Duration::days(3),
            response_ttl: None,
            store: Arc::new(MemoryStore::new()),
            lookup: FakeLookup::new(),
        }
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce = Duration::from_millis(ms);
        self
    }

    pub fn max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn history_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.history_ttl = ttl;
        self
    }

    pub fn response_cache(mut self, ttl: chrono::Duration) -> Self {
        self.response_ttl = Some(ttl);
        self
    }

    pub fn store(mut self, store: Arc<dyn KvStore>) -> Self {
        self.store = store;
        self
    }

    pub fn lookup(mut self, lookup: Arc<FakeLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn build(self) -> Harness {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let recorder = Recorder::new();

        let lookup: Arc<dyn Lookup> = self.lookup.clone();
        let mut fetcher = SuggestionFetcher::new(lookup, self.max_results);
        if let Some(ttl) = self.response_ttl {
            let responses = TtlCache::with_clock(Arc::clone(&self.store), ttl, clock.clone());
            fetcher = fetcher.with_response_cache(responses, RESPONSE_PREFIX);
        }
        let history = TtlCache::with_clock(Arc::clone(&self.store), self.history_ttl, clock.clone());
        let options = SessionOptions {
            debounce: self.debounce,
            history_prefix: HISTORY_PREFIX.to_string(),
        };
        let session =
            SearchSession::new(fetcher, history, recorder.clone(), options).with_reporter(recorder.clone());

        Harness {
            session,
            lookup: self.lookup,
            recorder,
            store: self.store,
            clock,
        }
    }
}

/// Let the debounce window elapse and apply the one lookup it dispatches.
pub async fn settle(session: &mut SearchSession) -> bool {
    tokio::time::sleep(Duration::from_millis(200)).await;
    session.pump().await
}
