//! Status bar — one line at the bottom: last route or last error on the
//! left, key hints on the right.

use crate::status::Status;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const HINTS: &str = " ↑↓ move  ⏎ search  esc close  ^c quit ";

pub struct StatusBar<'a> {
    status: &'a Status,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(status: &'a Status, theme: &'a Theme) -> Self {
        Self { status, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = match (&self.status.error, &self.status.route) {
            (Some(err), _) => Span::styled(format!(" ✗ {err}"), self.theme.status_error),
            (None, Some(route)) => Span::styled(format!(" → {route}"), self.theme.status_route),
            (None, None) => Span::raw(""),
        };
        Paragraph::new(Line::from(left)).render(area, buf);

        let hint_width = Span::raw(HINTS).width() as u16;
        if hint_width < area.width {
            let x = area.right().saturating_sub(hint_width);
            buf.set_string(x, area.y, HINTS, self.theme.status_hint);
        }
    }
}
