//! Domain-specific assertion macros for typeahead harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that show the
//! whole session state, which is what you need when a transition goes wrong.

/// Assert the recommended labels, in order.
///
/// ```rust,ignore
/// assert_recommended!(h.session, ["간암", "피부암"]);
/// ```
#[macro_export]
macro_rules! assert_recommended {
    ($session:expr, [$($label:expr),* $(,)?]) => {{
        let state = $session.state();
        let expected: Vec<&str> = vec![$($label),*];
        pretty_assertions::assert_eq!(
            state.recommended_labels(),
            expected,
            "recommended labels differ; full state: {:#?}",
            state
        );
    }};
}

/// Assert the text field contents and focused index together.
#[macro_export]
macro_rules! assert_focus {
    ($session:expr, $text:expr, $index:expr) => {{
        let state = $session.state();
        pretty_assertions::assert_eq!(
            (state.query_text.as_str(), state.focused_index),
            ($text, $index),
            "text/focus differ; full state: {:#?}",
            state
        );
    }};
}
