pub mod bulk_action_popup;
pub mod input_bar;
pub mod keybindings_modal;
pub mod logs;
pub mod record_table;
pub mod status_bar;
pub mod task_progress;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A `percent_x` by `percent_y` rectangle centred in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
