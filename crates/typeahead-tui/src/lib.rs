//! typeahead TUI — ratatui front end for the search session.

pub mod app;
pub mod event;
pub mod status;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use status::StatusLine;

use std::sync::Arc;
use typeahead_core::config::Config;
use typeahead_core::{KvStore, Lookup, SearchSession};

/// Build a session from `config` and run the search box until the user quits.
pub async fn run(config: Config, lookup: Arc<dyn Lookup>, store: Arc<dyn KvStore>) -> anyhow::Result<()> {
    let theme = theme::Theme::load_default();
    let status = Arc::new(StatusLine::default());
    let session = SearchSession::from_config(&config, lookup, store, status.clone())
        .with_reporter(status.clone());
    App::new(session, status, config.ui, theme).run().await
}
