//! Ratatui widgets for the typeahead TUI.

pub mod keyword_card;
pub mod search_bar;
pub mod status_bar;
