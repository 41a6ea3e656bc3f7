//! Terminal-side collaborators for the search session.
//!
//! There is no router in a terminal, so "navigating" to a results page just
//! records the route for the status bar. Lookup failures land in the same
//! place instead of a toast.

use std::sync::Mutex;
use typeahead_core::{ErrorReporter, LookupError, Navigator};

/// Shared last-route / last-error slot rendered by the status bar.
#[derive(Debug, Default)]
pub struct StatusLine {
    inner: Mutex<Status>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    pub route: Option<String>,
    pub error: Option<String>,
}

impl StatusLine {
    pub fn snapshot(&self) -> Status {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn update(&self, f: impl FnOnce(&mut Status)) {
        let mut guard = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard);
    }
}

impl Navigator for StatusLine {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigate");
        self.update(|s| {
            s.route = Some(path.to_string());
            s.error = None;
        });
    }
}

impl ErrorReporter for StatusLine {
    fn report(&self, error: &LookupError) {
        tracing::warn!(error = %error, "lookup failed");
        self.update(|s| s.error = Some(error.to_string()));
    }
}
