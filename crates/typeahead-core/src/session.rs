//! Search session controller — the one object a rendering layer talks to.
//!
//! A [`SearchSession`] is created per mounted widget and owns everything the
//! widget needs: the [`SessionState`], the debouncer in front of the
//! [`SuggestionFetcher`], the recent-search history cache, and the channel on
//! which finished lookups come back.
//!
//! # Ordering
//!
//! All transitions run synchronously on the caller's task. The only
//! out-of-order input is a finished lookup, so every lookup is dispatched
//! with a [`FetchTicket`] holding the session's edit generation at dispatch
//! time. [`SearchSession::apply`] discards any result whose generation is no
//! longer current. Text edits and clears bump the generation; arrow-key
//! previews do not.
//!
//! # Driving
//!
//! The owner feeds user input through the action methods and awaits
//! [`SearchSession::next_fetched`] (typically inside `tokio::select!`),
//! passing each result to [`SearchSession::apply`].

use crate::cache::TtlCache;
use crate::collab::{search_path, ErrorReporter, Lookup, Navigator, TracingReporter};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::fetcher::{Fetched, SuggestionFetcher};
use crate::selection::{Effect, SelectionInput};
use crate::store::KvStore;
use crate::types::{CachedTerm, FetchTicket, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default quiet period before a lookup is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default key prefix of the recent-search history.
pub const DEFAULT_HISTORY_PREFIX: &str = "search:history:";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub history_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            history_prefix: DEFAULT_HISTORY_PREFIX.to_string(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.lookup.debounce_ms),
            history_prefix: config.cache.history_prefix.clone(),
        }
    }
}

pub struct SearchSession {
    state: SessionState,
    generation: u64,
    debouncer: Debouncer<FetchTicket>,
    history: TtlCache<CachedTerm>,
    history_prefix: String,
    response_prefix: Option<String>,
    navigator: Arc<dyn Navigator>,
    reporter: Arc<dyn ErrorReporter>,
    results: mpsc::UnboundedReceiver<Fetched>,
}

impl SearchSession {
    pub fn new(
        fetcher: SuggestionFetcher,
        history: TtlCache<CachedTerm>,
        navigator: Arc<dyn Navigator>,
        options: SessionOptions,
    ) -> Self {
        let (tx, results) = mpsc::unbounded_channel();
        let response_prefix = fetcher.response_prefix().map(str::to_owned);
        let debouncer = Debouncer::new(options.debounce, move |ticket: FetchTicket| {
            fetcher.dispatch(ticket, tx.clone());
        });
        Self {
            state: SessionState::default(),
            generation: 0,
            debouncer,
            history,
            history_prefix: options.history_prefix,
            response_prefix,
            navigator,
            reporter: Arc::new(TracingReporter),
            results,
        }
    }

    /// Wire a session from configuration: a response cache and a history
    /// cache, each with its own TTL, over the shared `store`.
    pub fn from_config(
        config: &Config,
        lookup: Arc<dyn Lookup>,
        store: Arc<dyn KvStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let responses = TtlCache::new(Arc::clone(&store), config.cache.response_ttl());
        let fetcher = SuggestionFetcher::new(lookup, config.lookup.max_results)
            .with_response_cache(responses, config.cache.response_prefix.clone());
        let history = TtlCache::new(store, config.cache.history_ttl());
        Self::new(fetcher, history, navigator, SessionOptions::from_config(config))
    }

    /// Replace the default (logging) error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current edit generation; bumps on every text edit and clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A debounced lookup is scheduled but has not been dispatched yet.
    pub fn fetch_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn type_text(&mut self, text: impl Into<String>) {
        self.handle(SelectionInput::Type(text.into()));
    }

    pub fn open(&mut self) {
        self.handle(SelectionInput::Open);
    }

    /// Reset text, suggestions and focus, then run `continuation` (for
    /// example, to put input focus back in the text field).
    pub fn clear<F: FnOnce()>(&mut self, continuation: F) {
        self.handle(SelectionInput::Clear);
        continuation();
    }

    pub fn arrow_up(&mut self) {
        self.handle(SelectionInput::ArrowUp);
    }

    pub fn arrow_down(&mut self) {
        self.handle(SelectionInput::ArrowDown);
    }

    pub fn enter(&mut self, composing: bool) {
        self.handle(SelectionInput::Enter { composing });
    }

    pub fn pick(&mut self, label: impl Into<String>) {
        self.handle(SelectionInput::Pick(label.into()));
    }

    pub fn escape(&mut self) {
        self.handle(SelectionInput::Escape);
    }

    pub fn outside_interaction(&mut self) {
        self.handle(SelectionInput::OutsideInteraction);
    }

    /// Apply one input and carry out its effect.
    pub fn handle(&mut self, input: SelectionInput) {
        let invalidates = matches!(input, SelectionInput::Type(_) | SelectionInput::Clear);
        if invalidates {
            self.generation += 1;
            self.debouncer.cancel();
        }

        match self.state.handle(input) {
            Effect::None => {}
            Effect::Fetch(query) => self.debouncer.call(FetchTicket {
                generation: self.generation,
                query,
            }),
            Effect::LoadHistory => self.refresh_history(),
            Effect::Submit(term) => {
                self.submit(&term);
            }
        }
    }

    /// Record `term` in the history and navigate to its results page.
    ///
    /// Blank terms are ignored. Expired responses sharing the store are swept
    /// first so they cannot crowd the write out of a bounded store. Any
    /// existing history entry with the same label is removed so a
    /// resubmission refreshes rather than duplicates. Returns whether the
    /// term was submitted.
    pub fn submit(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            tracing::debug!("session: blank submission ignored");
            return false;
        }

        if let Some(prefix) = &self.response_prefix {
            self.history.prune(prefix);
        }
        let replaced = self
            .history
            .remove_by_value(&self.history_prefix, |cached| cached.label == term);
        let now = self.history.now();
        let key = format!("{}{:013}-{}", self.history_prefix, now.timestamp_millis(), term);
        self.history.put(
            &key,
            &CachedTerm {
                key: key.clone(),
                label: term.to_string(),
                stored_at: now,
            },
        );
        tracing::debug!(term, replaced, "session: term submitted");

        self.refresh_history();
        self.state.is_open = false;
        self.state.focused_index = None;
        self.navigator.navigate(&search_path(term));
        true
    }

    /// Reload live recent searches, newest first.
    pub fn refresh_history(&mut self) {
        let mut terms = self.history.list_valid(&self.history_prefix);
        terms.sort_by(|a, b| b.stored_at.cmp(&a.stored_at));
        self.state.cached_terms = terms.into_iter().map(|t| t.label).collect();
    }

    // -----------------------------------------------------------------------
    // Lookup results
    // -----------------------------------------------------------------------

    /// Wait for the next finished lookup. Pending forever while nothing is in
    /// flight, so use it as one arm of a `select!`.
    pub async fn next_fetched(&mut self) -> Option<Fetched> {
        self.results.recv().await
    }

    /// Apply a finished lookup if it is still current. Returns whether the
    /// suggestion list changed.
    pub fn apply(&mut self, fetched: Fetched) -> bool {
        if fetched.ticket.generation != self.generation {
            tracing::debug!(
                query = %fetched.ticket.query,
                dispatched = fetched.ticket.generation,
                live = self.generation,
                "session: stale lookup result dropped"
            );
            return false;
        }
        match fetched.result {
            Ok(suggestions) => {
                tracing::debug!(query = %fetched.ticket.query, count = suggestions.len(), "session: suggestions applied");
                self.state.replace_recommended(suggestions);
                true
            }
            Err(e) => {
                // Keep whatever is already on screen.
                self.reporter.report(&e);
                false
            }
        }
    }

    /// Wait for one lookup result and apply it.
    pub async fn pump(&mut self) -> bool {
        match self.next_fetched().await {
            Some(fetched) => self.apply(fetched),
            None => false,
        }
    }

    /// Apply every result that has already arrived, without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(fetched) = self.results.try_recv() {
            if self.apply(fetched) {
                applied += 1;
            }
        }
        applied
    }

    /// Cancel the scheduled lookup. Call on widget teardown; dropping the
    /// session does the same.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
    }
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
