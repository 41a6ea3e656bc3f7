//! Keyword card — the dropdown under the search bar.
//!
//! Layout, top to bottom:
//!
//! ```text
//! 최근 검색어            (only when there are live recent searches)
//!   · 간암
//! ──────────
//! 추천 검색어
//!   · 간암                (focused row highlighted)
//!   · 피부암
//! ```
//!
//! With no suggestions the recommended section shows `검색어가 없습니다.`.
//! Every clickable row is reported by [`KeywordCard::hit_targets`] so the app
//! can map mouse clicks back to labels.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use typeahead_core::SessionState;

pub const RECENT_LABEL: &str = "최근 검색어";
pub const RECOMMENDED_LABEL: &str = "추천 검색어";
pub const EMPTY_LABEL: &str = "검색어가 없습니다.";

const BULLET: &str = "  · ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row<'a> {
    Section(&'static str),
    Item { label: &'a str, focused: bool },
    Empty,
    Divider,
}

pub struct KeywordCard<'a> {
    state: &'a SessionState,
    show_recent: bool,
    theme: &'a Theme,
}

impl<'a> KeywordCard<'a> {
    pub fn new(state: &'a SessionState, show_recent: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            show_recent,
            theme,
        }
    }

    /// Rows needed to show everything, plus the card border.
    pub fn height(&self) -> u16 {
        u16::try_from(self.rows().len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }

    /// Clickable rows within `area`: one `(rect, label)` per visible item.
    pub fn hit_targets(&self, area: Rect) -> Vec<(Rect, String)> {
        let inner = card_block().inner(area);
        self.rows()
            .into_iter()
            .enumerate()
            .take(inner.height as usize)
            .filter_map(|(i, row)| match row {
                Row::Item { label, .. } => Some((
                    Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
                    label.to_string(),
                )),
                _ => None,
            })
            .collect()
    }

    fn rows(&self) -> Vec<Row<'a>> {
        let mut rows = Vec::new();
        if self.show_recent && !self.state.cached_terms.is_empty() {
            rows.push(Row::Section(RECENT_LABEL));
            rows.extend(self.state.cached_terms.iter().map(|label| Row::Item {
                label: label.as_str(),
                focused: false,
            }));
            rows.push(Row::Divider);
        }

        rows.push(Row::Section(RECOMMENDED_LABEL));
        if self.state.recommended.is_empty() {
            rows.push(Row::Empty);
        } else {
            rows.extend(self.state.recommended.iter().enumerate().map(|(i, s)| Row::Item {
                label: s.label.as_str(),
                focused: self.state.focused_index == Some(i),
            }));
        }
        rows
    }
}

fn card_block() -> Block<'static> {
    Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
}

impl Widget for KeywordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = card_block().border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let divider = "─".repeat(inner.width as usize);
        let lines: Vec<Line> = self
            .rows()
            .into_iter()
            .map(|row| match row {
                Row::Section(label) => Line::from(Span::styled(label, self.theme.section_label)),
                Row::Item { label, focused } => {
                    let style = if focused {
                        self.theme.item_focused
                    } else {
                        self.theme.item
                    };
                    Line::from(vec![Span::styled(BULLET, style), Span::styled(label, style)])
                        .style(style)
                }
                Row::Empty => Line::from(vec![
                    Span::styled(BULLET, self.theme.empty),
                    Span::styled(EMPTY_LABEL, self.theme.empty),
                ]),
                Row::Divider => Line::from(Span::styled(divider.clone(), self.theme.divider)),
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
