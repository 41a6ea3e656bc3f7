//! typeahead-remote — the HTTP side of the lookup collaborator.
//!
//! [`HttpLookup`] issues `GET <endpoint>?q=<query>` against the suggestion
//! service and decodes the JSON payload into
//! [`Suggestion`](typeahead_core::Suggestion)s via [`wire`].

pub mod http;
pub mod wire;

pub use http::HttpLookup;
