use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::config::APP_NAME;
use crate::tui::app::{App, InputMode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let theme = &app.theme;

        let status_bar_style = Style::default()
            .fg(theme.status_bar_foreground)
            .bg(theme.status_bar_background);

        let status_bar_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let mode_bg = match app.input_mode {
            InputMode::Normal => theme.status_bar_mode_normal_bg,
            InputMode::Searching => theme.status_bar_mode_searching_bg,
            InputMode::Filtering => theme.status_bar_mode_filtering_bg,
            InputMode::ComposingBulk => theme.status_bar_mode_composing_bg,
        };

        let mut status_spans_left = vec![
            Span::styled(format!("{} | ", APP_NAME), status_bar_style),
            Span::styled(
                app.active_view.title(),
                Style::default()
                    .fg(theme.status_bar_view_name_fg)
                    .bg(theme.status_bar_background)
                    .bold(),
            ),
            Span::styled(" | ", status_bar_style),
            Span::styled(
                format!("{:?}", app.input_mode),
                Style::default().fg(theme.primary_background).bg(mode_bg).bold(),
            ),
        ];
        if let Some(table) = app.active_table() {
            let selected = table.selected_count();
            if selected > 0 {
                status_spans_left.push(Span::styled(format!(" | {} selected", selected), status_bar_style));
            }
        }
        if let Some(message) = &app.status_message {
            status_spans_left.push(Span::styled(format!(" | {}", message), status_bar_style));
        }

        f.render_widget(
            Paragraph::new(Line::from(status_spans_left)).style(status_bar_style),
            status_bar_layout[0],
        );

        let language = app.locale.current();
        let status_spans_right = vec![
            Span::styled(format!("{} ", language.native_name), status_bar_style),
            Span::raw("| "),
            Span::from(Local::now().format("%H:%M:%S").to_string()),
        ];

        f.render_widget(
            Paragraph::new(Line::from(status_spans_right))
                .style(status_bar_style)
                .alignment(Alignment::Right),
            status_bar_layout[1],
        );
    }
}
