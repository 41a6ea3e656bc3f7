//! Selection state machine — deterministic transitions over [`SessionState`].
//!
//! Every user-facing input is a [`SelectionInput`]. [`SessionState::handle`]
//! applies it synchronously and returns the [`Effect`] the controller must
//! carry out (schedule a fetch, reload history, submit). The machine itself
//! performs no I/O, which keeps every transition unit-testable.
//!
//! # Transitions
//!
//! | Input                 | State change                                   | Effect          |
//! |-----------------------|------------------------------------------------|-----------------|
//! | `Type(text)`          | text = `text`, focus cleared                   | `Fetch(text)`   |
//! | `Open`                | opened (only if closed)                        | `LoadHistory`   |
//! | `Clear`               | text, suggestions, focus reset                 | none            |
//! | `ArrowUp`             | focus wraps upward, text previews label        | none            |
//! | `ArrowDown`           | focus wraps downward, text previews label      | none            |
//! | `Enter`               | none                                           | `Submit(text)`  |
//! | `Enter` (composing)   | none                                           | none            |
//! | `Pick(label)`         | text = `label`                                 | `Submit(label)` |
//! | `Escape`              | closed, focus cleared                          | none            |
//! | `OutsideInteraction`  | closed, focus cleared                          | none            |
//!
//! Arrow keys on an empty suggestion list are no-ops.

use crate::types::{SessionState, Suggestion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    /// The input text was edited to the given value.
    Type(String),
    /// The widget gained focus.
    Open,
    /// The clear button was pressed.
    Clear,
    ArrowUp,
    ArrowDown,
    /// Enter was pressed. `composing` is set while an input method is still
    /// assembling a character; such an Enter is not a commit.
    Enter { composing: bool },
    /// A dropdown entry was chosen with the pointer.
    Pick(String),
    Escape,
    /// A pointer or focus event landed outside the widget.
    OutsideInteraction,
}

/// Work the controller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Schedule a debounced lookup for this text.
    Fetch(String),
    /// Re-read recent searches from the history cache.
    LoadHistory,
    /// Hand this term to the submission path.
    Submit(String),
}

impl SessionState {
    /// Apply one input. See the module docs for the transition table.
    pub fn handle(&mut self, input: SelectionInput) -> Effect {
        match input {
            SelectionInput::Type(text) => {
                self.query_text = text.clone();
                self.focused_index = None;
                tracing::debug!(query = %self.query_text, "selection: text edited");
                Effect::Fetch(text)
            }
            SelectionInput::Open => {
                if self.is_open {
                    return Effect::None;
                }
                self.is_open = true;
                tracing::debug!("selection: opened");
                Effect::LoadHistory
            }
            SelectionInput::Clear => {
                self.query_text.clear();
                self.recommended.clear();
                self.focused_index = None;
                tracing::debug!("selection: cleared");
                Effect::None
            }
            SelectionInput::ArrowUp => {
                let len = self.recommended.len();
                if len == 0 {
                    return Effect::None;
                }
                let next = match self.focused_index {
                    None | Some(0) => len - 1,
                    Some(i) => i - 1,
                };
                self.focus(next);
                Effect::None
            }
            SelectionInput::ArrowDown => {
                let len = self.recommended.len();
                if len == 0 {
                    return Effect::None;
                }
                let next = match self.focused_index {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.focus(next);
                Effect::None
            }
            SelectionInput::Enter { composing: true } => {
                tracing::debug!("selection: enter ignored while composing");
                Effect::None
            }
            SelectionInput::Enter { composing: false } => Effect::Submit(self.query_text.clone()),
            SelectionInput::Pick(label) => {
                self.query_text = label.clone();
                Effect::Submit(label)
            }
            SelectionInput::Escape | SelectionInput::OutsideInteraction => {
                self.is_open = false;
                self.focused_index = None;
                tracing::debug!("selection: closed");
                Effect::None
            }
        }
    }

    /// Install a fresh suggestion list. The old focus position is meaningless
    /// against new contents, so it is cleared.
    pub fn replace_recommended(&mut self, suggestions: Vec<Suggestion>) {
        self.recommended = suggestions;
        self.focused_index = None;
    }

    fn focus(&mut self, index: usize) {
        self.focused_index = Some(index);
        // Keyboard browsing previews the term in the input.
        self.query_text = self.recommended[index].label.clone();
        tracing::debug!(index, query = %self.query_text, "selection: focus moved");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
