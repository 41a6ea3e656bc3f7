//! Terminal ownership: raw mode, alternate screen, mouse capture and the
//! background input reader.
//!
//! Both types are scoped. [`TerminalGuard`] restores the terminal when it is
//! dropped, and [`InputListener`] stops its reader thread on drop, so an
//! early return or `?` inside the event loop cannot leave the shell broken.

use crate::event::{self, AppEvent};
use crossterm::{
    event::{
        self as ct_event, DisableFocusChange, DisableMouseCapture, EnableFocusChange,
        EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the reader thread blocks before re-checking its stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Puts the terminal into TUI mode on construction and back on drop.
pub struct TerminalGuard {
    terminal: Term,
}

impl TerminalGuard {
    pub fn acquire() -> anyhow::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        tracing::debug!("terminal acquired");
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
        let _ = self.terminal.show_cursor();
        tracing::debug!("terminal restored");
    }
}

fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
}

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Input reader
// ---------------------------------------------------------------------------

/// Reads crossterm events on a dedicated thread and forwards the mapped
/// [`AppEvent`]s over a channel the async event loop can `select!` on.
pub struct InputListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputListener {
    pub fn attach(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                match ct_event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "input: poll failed");
                        break;
                    }
                }
                let raw = match ct_event::read() {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!(error = %e, "input: read failed");
                        break;
                    }
                };
                if let Some(ev) = event::to_app_event(raw) {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
            tracing::debug!("input: reader stopped");
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
