//! Search bar widget — the bordered text input at the top of the screen.
//!
//! Shows the placeholder while the widget is closed and empty, otherwise the
//! current query text. The border is highlighted while the dropdown is open.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use typeahead_core::SessionState;

const PROMPT: &str = "> ";
const CLEAR_HINT: &str = " ^L ✕ ";

pub struct SearchBar<'a> {
    state: &'a SessionState,
    placeholder: &'a str,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(state: &'a SessionState, placeholder: &'a str, theme: &'a Theme) -> Self {
        Self {
            state,
            placeholder,
            theme,
        }
    }

    /// Terminal cell where the text cursor belongs, given the bar's area.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner = Block::bordered().inner(area);
        let text_width = Span::raw(self.state.query_text.as_str()).width() as u16;
        let x = inner.x + PROMPT.len() as u16 + text_width;
        (x.min(inner.right().saturating_sub(1)), inner.y)
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.state.is_open {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered().border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.state.shows_placeholder() {
            Line::from(vec![
                Span::styled(PROMPT, self.theme.placeholder),
                Span::styled(self.placeholder, self.theme.placeholder),
            ])
        } else {
            Line::from(vec![
                Span::styled(PROMPT, border_style),
                Span::styled(self.state.query_text.as_str(), self.theme.input_text),
            ])
        };
        Paragraph::new(line).render(inner, buf);

        // Clear button, only when there is something to clear.
        if !self.state.query_text.is_empty() {
            let hint_width = Span::raw(CLEAR_HINT).width() as u16;
            let x = inner.right().saturating_sub(hint_width);
            buf.set_string(x, inner.y, CLEAR_HINT, self.theme.status_hint);
        }
    }
}
