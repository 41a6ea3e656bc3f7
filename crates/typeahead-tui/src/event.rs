//! Semantic application events — crossterm events mapped to a
//! widget-agnostic vocabulary so the search session never touches crossterm.
//!
//! # Keybindings
//!
//! | Input                     | Event            |
//! |---------------------------|------------------|
//! | `Ctrl+c`                  | `Quit`           |
//! | `Ctrl+l`                  | `Clear`          |
//! | printable char            | `Char(c)`        |
//! | `Backspace`               | `Backspace`      |
//! | `↑` / `↓`                 | `Up` / `Down`    |
//! | `Enter`                   | `Enter`          |
//! | `Esc`                     | `Escape`         |
//! | left mouse button down    | `Click(col, row)`|
//! | terminal loses focus      | `FocusLost`      |
//! | terminal resize           | `Resize(w, h)`   |
//!
//! The search box is always in text-entry mode, so there are no single-letter
//! shortcuts: every printable key types.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Empty the search box (the clear button).
    Clear,
    Char(char),
    Backspace,
    Up,
    Down,
    Enter,
    Escape,
    /// Primary button pressed at (column, row).
    Click(u16, u16),
    /// The terminal window lost focus; treated as an interaction outside the
    /// widget.
    FocusLost,
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`].
///
/// Returns `None` for events with no meaning here: key releases, mouse moves
/// and scrolls, pastes, unbound keys.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::FocusLost => Some(AppEvent::FocusLost),
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click(mouse.column, mouse.row)),
            _ => None,
        },
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    // Windows terminals report both press and release.
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Char('l') if key.modifiers == Mod::CONTROL => Some(AppEvent::Clear),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => Some(AppEvent::Char(c)),

        Backspace => Some(AppEvent::Backspace),
        Up => Some(AppEvent::Up),
        Down => Some(AppEvent::Down),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
