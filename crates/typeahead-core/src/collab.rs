//! External collaborators of the suggestion engine.
//!
//! The engine never talks HTTP, routes, or renders. It calls out through
//! these traits: [`Lookup`] for remote suggestions, [`Navigator`] for the
//! submission hand-off, and [`ErrorReporter`] for user-visible failures.

use crate::error::LookupError;
use crate::types::Suggestion;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Remote suggestion service.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Fetch suggestions for `query`, in service order.
    async fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError>;

    /// Identity of the request `query` would produce, used as the response
    /// cache key. HTTP lookups return the full request URL.
    fn request_key(&self, query: &str) -> String {
        query.to_string()
    }
}

/// Route changes triggered by a submitted search.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Shared sink for user-visible errors.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &LookupError);
}

/// Default reporter: log and move on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &LookupError) {
        tracing::error!(error = %error, "suggestion lookup failed");
    }
}

/// Characters left unescaped in a query component: RFC 3986 unreserved
/// plus `!*'()`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` for use as a single query-string component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Route of the results page for `term`.
pub fn search_path(term: &str) -> String {
    format!("/search?q={}", encode_component(term))
}
