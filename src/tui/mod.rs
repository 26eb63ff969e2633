use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tokio::sync::mpsc;

pub mod app;
pub mod events;
pub mod table_source;
pub mod theme;
pub mod tracing_layer;
pub mod ui;
pub mod widgets;

pub use app::{App, UILogEntry};
use events::run_app_loop;

use crate::config::Config;

/// Runs the registry browser until the user quits.
///
/// Puts the terminal in raw mode on an alternate screen and restores it on
/// the way out, including when the event loop fails.
pub async fn run_tui(config: Arc<Config>, log_receiver: mpsc::UnboundedReceiver<UILogEntry>) -> Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, log_receiver);
    let res = run_app_loop(&mut terminal, &mut app).await;
    app.teardown();

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        // Also lands in the log file when file logging is on
        tracing::error!("TUI event loop failed: {:?}", err);
    }

    Ok(())
}
