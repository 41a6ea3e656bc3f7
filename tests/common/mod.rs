//! Shared test utilities for typeahead integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Session harnesses run under `tokio::time::pause()` so
//! the debounce window is deterministic.

pub mod assertions;
pub mod builders;
pub mod fake_lookup;
pub mod fake_lookup_api;
pub mod fixtures;

pub use builders::*;
pub use fake_lookup::*;
pub use fixtures::*;
