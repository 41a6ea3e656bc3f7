//! typeahead-core — the search-suggestion engine.
//!
//! This crate holds everything about a search box that has real invariants:
//! the TTL cache of recent searches, the debouncer in front of remote
//! lookups, the stale-result guard, and the keyboard selection state machine.
//! Rendering, HTTP and routing live behind the traits in [`collab`].
//!
//! # Architecture
//!
//! ```text
//! keystroke ──► Selection ──► Debouncer ──► Fetcher ──► Lookup
//!                  ▲                           │
//!                  └──── SearchSession ◄───────┘ (generation-checked)
//!                             │
//!                  submit ────┴──► TtlCache ──► KvStore
//!                             └──► Navigator
//! ```
//!
//! Finished lookups come back over a `tokio` channel; all state transitions
//! happen on the task that owns the [`SearchSession`].

pub mod cache;
pub mod clock;
pub mod collab;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;

pub use cache::{CacheEnvelope, TtlCache};
pub use collab::{ErrorReporter, Lookup, Navigator};
pub use error::{LookupError, StoreError};
pub use fetcher::{Fetched, SuggestionFetcher};
pub use selection::{Effect, SelectionInput};
pub use session::{SearchSession, SessionOptions};
pub use store::{FileStore, KvStore, MemoryStore};
pub use types::{CachedTerm, FetchTicket, SessionState, Suggestion, Timestamp};
