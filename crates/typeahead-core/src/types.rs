//! Core types for typeahead-core.
//!
//! This module defines the data shared across the engine: the remote
//! [`Suggestion`], the persisted [`CachedTerm`], and the observable
//! [`SessionState`] consumed by the rendering layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time used for cache expiry bookkeeping.
pub type Timestamp = DateTime<Utc>;

/// One result from the remote lookup service.
///
/// `code` uniquely identifies the suggestion; `label` is both the display
/// text and the value placed into the text field when the suggestion is
/// browsed or picked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(alias = "sickCd")]
    pub code: String,
    #[serde(alias = "sickNm")]
    pub label: String,
}

impl Suggestion {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// A previously submitted search string, persisted across restarts.
///
/// Immutable once stored: resubmitting the same label deletes the old entry
/// and writes a fresh one rather than updating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTerm {
    pub key: String,
    pub label: String,
    pub stored_at: Timestamp,
}

/// Observable state of one mounted search widget.
///
/// Invariants maintained by the transitions in [`crate::selection`]:
/// - `focused_index` is `None` or a valid index into `recommended`, and is
///   always `None` when `recommended` is empty.
/// - `focused_index` is conventionally `None` while `is_open` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Text currently displayed in the input.
    pub query_text: String,
    /// Suggestions returned by the latest applied lookup.
    pub recommended: Vec<Suggestion>,
    /// Labels of live recent searches, newest first.
    pub cached_terms: Vec<String>,
    /// Whether the dropdown is shown.
    pub is_open: bool,
    /// Keyboard-highlighted position within `recommended`.
    pub focused_index: Option<usize>,
}

impl SessionState {
    /// Labels of the recommended suggestions, in service order.
    pub fn recommended_labels(&self) -> Vec<&str> {
        self.recommended.iter().map(|s| s.label.as_str()).collect()
    }

    /// The suggestion under the keyboard cursor, if any.
    pub fn focused(&self) -> Option<&Suggestion> {
        self.focused_index.and_then(|i| self.recommended.get(i))
    }

    /// Placeholder mode: the widget is closed and has no text.
    pub fn shows_placeholder(&self) -> bool {
        !self.is_open && self.query_text.is_empty()
    }
}

/// Snapshot token carried by a dispatched fetch.
///
/// `generation` is the session's edit counter at dispatch time; a result is
/// only applied while the session is still at that generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
}
