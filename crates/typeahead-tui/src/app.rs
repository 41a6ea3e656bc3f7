//! Application shell: owns the [`SearchSession`], renders it, and routes
//! terminal events into session actions.
//!
//! The event loop is a `tokio::select!` over two sources: user input from
//! the [`InputListener`] thread and finished lookups from the session. Both
//! are handled on this one task, so every session transition is serialized.

use crate::event::AppEvent;
use crate::status::StatusLine;
use crate::terminal::{InputListener, Term, TerminalGuard};
use crate::theme::Theme;
use crate::widgets::{keyword_card::KeywordCard, search_bar::SearchBar, status_bar::StatusBar};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    Frame,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use typeahead_core::config::UiConfig;
use typeahead_core::SearchSession;

/// The search column never grows wider than this.
const MAX_WIDTH: u16 = 72;

/// Screen regions from the last frame, for mouse hit-testing.
#[derive(Debug, Default)]
struct HitMap {
    input: Rect,
    card: Option<Rect>,
    items: Vec<(Rect, String)>,
}

pub struct App {
    session: SearchSession,
    status: Arc<StatusLine>,
    ui: UiConfig,
    theme: Theme,
    hits: HitMap,
    quit: bool,
}

impl App {
    pub fn new(session: SearchSession, status: Arc<StatusLine>, ui: UiConfig, theme: Theme) -> Self {
        Self {
            session,
            status,
            ui,
            theme,
            hits: HitMap::default(),
            quit: false,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Take over the terminal and run until the user quits.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut guard = TerminalGuard::acquire()?;
        let (tx, mut events) = mpsc::unbounded_channel();
        let _listener = InputListener::attach(tx);

        let result = self.event_loop(guard.terminal_mut(), &mut events).await;
        self.session.shutdown();
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Term,
        events: &mut mpsc::UnboundedReceiver<AppEvent>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if self.quit {
                break;
            }

            tokio::select! {
                ev = events.recv() => match ev {
                    Some(ev) => {
                        tracing::debug!(event = ?ev, "input event");
                        self.handle(ev);
                    }
                    // Reader thread gave up; nothing more can arrive.
                    None => break,
                },
                Some(fetched) = self.session.next_fetched() => {
                    self.session.apply(fetched);
                }
            }
        }
        Ok(())
    }

    /// Route one event to the session.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.quit = true,
            AppEvent::Char(c) => {
                let mut text = self.session.state().query_text.clone();
                text.push(c);
                self.session.open();
                self.session.type_text(text);
            }
            AppEvent::Backspace => {
                let mut text = self.session.state().query_text.clone();
                if text.pop().is_some() {
                    self.session.open();
                    self.session.type_text(text);
                }
            }
            AppEvent::Up => {
                self.session.open();
                self.session.arrow_up();
            }
            AppEvent::Down => {
                self.session.open();
                self.session.arrow_down();
            }
            // Terminals deliver composed characters only, so Enter always
            // commits.
            AppEvent::Enter => self.session.enter(false),
            AppEvent::Escape => self.session.escape(),
            AppEvent::Clear => {
                let mut refocus = false;
                self.session.clear(|| refocus = true);
                if refocus {
                    self.session.open();
                }
            }
            AppEvent::Click(column, row) => self.click(Position::new(column, row)),
            AppEvent::FocusLost => self.session.outside_interaction(),
            AppEvent::Resize(..) => {}
        }
    }

    fn click(&mut self, at: Position) {
        if self.hits.input.contains(at) {
            self.session.open();
            return;
        }
        if self.session.state().is_open {
            let picked = self
                .hits
                .items
                .iter()
                .find(|(rect, _)| rect.contains(at))
                .map(|(_, label)| label.clone());
            if let Some(label) = picked {
                self.session.pick(label);
                return;
            }
            if self.hits.card.is_some_and(|card| card.contains(at)) {
                return;
            }
        }
        self.session.outside_interaction();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [main, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        let width = main.width.min(MAX_WIDTH);
        let column = Rect {
            x: main.x + (main.width - width) / 2,
            width,
            ..main
        };
        let [bar_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(column);

        let state = self.session.state();
        let bar = SearchBar::new(state, &self.ui.placeholder, &self.theme);
        let cursor = bar.cursor_position(bar_area);
        frame.render_widget(bar, bar_area);

        self.hits.input = bar_area;
        self.hits.card = None;
        self.hits.items.clear();

        if state.is_open {
            let card = KeywordCard::new(state, self.ui.show_recent, &self.theme);
            let card_area = Rect {
                height: card.height().min(body.height),
                ..body
            };
            self.hits.items = card.hit_targets(card_area);
            self.hits.card = Some(card_area);
            frame.render_widget(card, card_area);
            frame.set_cursor_position(cursor);
        }

        let status = self.status.snapshot();
        frame.render_widget(StatusBar::new(&status, &self.theme), status_area);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
