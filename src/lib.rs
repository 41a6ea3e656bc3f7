//! typeahead — terminal search box with debounced remote suggestions and a
//! TTL cache of recent searches.
//!
//! The engine lives in [`typeahead_core`], the HTTP lookup client in
//! [`typeahead_remote`] and the terminal front end in [`typeahead_tui`]. This
//! crate wires them into the `typeahead` binary and provides
//! [`mock_server`], a stand-in lookup service for local runs and tests.
//!
//! # Architecture
//!
//! ```text
//! typeahead-tui ──► typeahead-core ──► typeahead-remote ──► lookup service
//!                        │                                  (or mock_server)
//!                        └──► KvStore (store.json)
//! ```

pub mod mock_server;

pub use typeahead_core;
pub use typeahead_remote;
pub use typeahead_tui;
