use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::app::{App, AppView, InputMode};
use super::widgets::{
    bulk_action_popup::BulkActionPopupWidget, input_bar::InputBarWidget,
    keybindings_modal::KeybindingsModalWidget, logs::LogsWidget, record_table::RecordTableWidget,
    status_bar::StatusBarWidget, task_progress::TaskProgressWidget,
};

pub fn ui(f: &mut Frame, app: &mut App) {
    // Status bar on top, content in the middle, then task progress and the input bar.
    let main_layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                              // Status bar
            Constraint::Min(0),                                 // Main content
            Constraint::Length(TaskProgressWidget::height(app)), // Running task
            Constraint::Length(3),                              // Input bar
        ])
        .split(f.size());

    StatusBarWidget::render(f, app, main_layout_chunks[0]);

    let main_content_area = main_layout_chunks[1];
    match app.active_view {
        AppView::Registry(dataset) => {
            RecordTableWidget::render(f, app, app.table(dataset), main_content_area);
        }
        AppView::Logs => {
            LogsWidget::render(f, app, main_content_area);
        }
    }

    TaskProgressWidget::render(f, app, main_layout_chunks[2]);
    InputBarWidget::render(f, app, main_layout_chunks[3]);

    // Popups over the main content
    if app.input_mode == InputMode::ComposingBulk {
        BulkActionPopupWidget::render(f, app, f.size());
    }
    if app.show_keybindings_modal {
        KeybindingsModalWidget::render(f, app, f.size());
    }
}
