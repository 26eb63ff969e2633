// src/tui/events.rs

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;
use tracing::debug;

use super::app::{App, AppView, InputMode};
use super::ui::ui;
use crate::services::BulkActionKind;

const MAX_LOG_ENTRIES: usize = 1000;
const PAGE_SIZE_STEP: isize = 5;

pub async fn run_app_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let mut crossterm_events = EventStream::new();
    let mut locale_receiver = app.locale_receiver.take();

    loop {
        terminal.draw(|f| ui(f, app))?;

        // --- Log Handling ---
        if let Some(ref mut receiver) = app.log_receiver {
            while let Ok(log_entry) = receiver.try_recv() {
                app.log_entries.push(log_entry);
            }
        }
        if app.log_entries.len() > MAX_LOG_ENTRIES {
            let overflow = app.log_entries.len() - MAX_LOG_ENTRIES;
            app.log_entries.drain(0..overflow);
        }
        if app.active_view == AppView::Logs {
            let is_scrolled_to_bottom = match app.log_list_state.selected() {
                Some(index) => index >= app.log_entries.len().saturating_sub(2),
                None => true,
            };
            if is_scrolled_to_bottom && !app.log_entries.is_empty() {
                app.log_list_state.select(Some(app.log_entries.len() - 1));
            }
        }

        let tick_duration = Duration::from_millis(app.config.interface.refresh_interval_ms);

        tokio::select! {
            Some(change) = recv_locale(&mut locale_receiver) => {
                debug!("Locale changed from {} to {}", change.previous.code, change.current.code);
                app.on_locale_changed(change);
            }

            Some(Ok(event)) = crossterm_events.next() => {
                match event {
                    CrosstermEvent::Key(key) => on_key(app, key),
                    CrosstermEvent::Mouse(mouse) => on_mouse_event(app, mouse),
                    _ => {}
                }
            }

            // Task progress is polled; the tick also redraws the gauge.
            _ = tokio::time::sleep(tick_duration) => {}
        }

        app.poll_task();

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn recv_locale<T>(receiver: &mut Option<tokio::sync::mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match receiver {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub fn on_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    let delta = match mouse_event.kind {
        MouseEventKind::ScrollUp => -1,
        MouseEventKind::ScrollDown => 1,
        _ => return,
    };
    match app.active_table_mut() {
        Some(table) => table.move_cursor(delta),
        None => app.scroll_logs(delta),
    }
}

pub fn on_key(app: &mut App, key_event: KeyEvent) {
    if app.show_keybindings_modal {
        if app.key_matches("help", &key_event) || key_event.code == KeyCode::Esc {
            app.show_keybindings_modal = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => on_normal_key(app, key_event),
        InputMode::Searching => match key_event.code {
            KeyCode::Enter => app.input_mode = InputMode::Normal,
            KeyCode::Esc => app.clear_search(),
            KeyCode::Backspace => {
                app.current_input.pop();
                app.apply_search_input();
            }
            KeyCode::Char(c) => {
                app.current_input.push(c);
                app.apply_search_input();
            }
            _ => {}
        },
        InputMode::Filtering => match key_event.code {
            KeyCode::Enter => app.submit_filter(),
            KeyCode::Esc => app.cancel_filter(),
            KeyCode::Backspace => {
                app.current_input.pop();
            }
            KeyCode::Char(c) => app.current_input.push(c),
            _ => {}
        },
        InputMode::ComposingBulk => match key_event.code {
            KeyCode::Enter => app.submit_bulk(),
            KeyCode::Esc => app.cancel_bulk(),
            KeyCode::Tab => app.cycle_bulk_alert_type(),
            KeyCode::BackTab => app.cycle_bulk_priority(),
            KeyCode::Backspace => {
                app.current_input.pop();
            }
            KeyCode::Char(c) => app.current_input.push(c),
            _ => {}
        },
    }
}

fn on_normal_key(app: &mut App, key_event: KeyEvent) {
    if app.key_matches("quit", &key_event) {
        app.should_quit = true;
    } else if app.key_matches("help", &key_event) {
        app.show_keybindings_modal = true;
    } else if app.key_matches("next_tab", &key_event) {
        app.next_view();
    } else if app.key_matches("prev_tab", &key_event) {
        app.previous_view();
    } else if app.key_matches("cycle_language", &key_event) {
        app.cycle_language();
    } else if app.key_matches("cancel_task", &key_event) {
        app.cancel_task();
    } else if app.active_view == AppView::Logs {
        if app.key_matches("up", &key_event) || key_event.code == KeyCode::Char('k') {
            app.scroll_logs(-1);
        } else if app.key_matches("down", &key_event) || key_event.code == KeyCode::Char('j') {
            app.scroll_logs(1);
        }
    } else {
        on_table_key(app, key_event);
    }
}

fn on_table_key(app: &mut App, key_event: KeyEvent) {
    if app.key_matches("search", &key_event) {
        app.start_search();
    } else if app.key_matches("filter", &key_event) {
        app.start_filter();
    } else if app.key_matches("clear_filters", &key_event) {
        app.clear_filters();
    } else if app.key_matches("bulk_message", &key_event) {
        app.begin_bulk(BulkActionKind::Message);
    } else if app.key_matches("bulk_alert", &key_event) {
        app.begin_bulk(BulkActionKind::Alert);
    } else if app.key_matches("bulk_emergency", &key_event) {
        app.begin_bulk(BulkActionKind::Emergency);
    } else if app.key_matches("issue_id", &key_event) {
        app.issue_digital_id();
    } else if app.key_matches("generate_efir", &key_event) {
        app.generate_efir();
    } else if key_event.code == KeyCode::Char('+') {
        app.resize_page(PAGE_SIZE_STEP);
    } else if key_event.code == KeyCode::Char('-') {
        app.resize_page(-PAGE_SIZE_STEP);
    } else if let KeyCode::Char(c @ '0'..='9') = key_event.code {
        // '0' is the tenth column
        let index = (c as usize - '0' as usize + 9) % 10;
        app.sort_by_column(index);
    } else {
        let up = app.key_matches("up", &key_event) || key_event.code == KeyCode::Char('k');
        let down = app.key_matches("down", &key_event) || key_event.code == KeyCode::Char('j');
        let next_page = app.key_matches("next_page", &key_event);
        let prev_page = app.key_matches("prev_page", &key_event);
        let toggle = app.key_matches("toggle_select", &key_event);
        let select_page = app.key_matches("select_page", &key_event);
        let clear = app.key_matches("clear_selection", &key_event);
        let Some(table) = app.active_table_mut() else {
            return;
        };
        if up {
            table.move_cursor(-1);
        } else if down {
            table.move_cursor(1);
        } else if next_page {
            table.next_page();
        } else if prev_page {
            table.prev_page();
        } else if toggle {
            table.toggle_cursor_row();
        } else if select_page {
            table.select_page();
        } else if clear {
            table.clear_selection();
        }
    }
}
