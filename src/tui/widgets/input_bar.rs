// src/tui/widgets/input_bar.rs
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::{App, AppView, InputMode};

pub struct InputBarWidget;

impl InputBarWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let theme = &app.theme;
        let kb = &app.config.keybindings;

        let (title_string, text, input_style) = match app.input_mode {
            InputMode::Searching => (
                "Search (Enter to keep, Esc to clear)".to_string(),
                format!("{}>", app.current_input),
                Style::default().fg(theme.input_bar_text_fg).bg(theme.input_bar_background),
            ),
            InputMode::Filtering => (
                "Filter: field=value, field>=n, field<n, field~text, field= to drop (Enter to apply, Esc to cancel)"
                    .to_string(),
                format!("{}>", app.current_input),
                Style::default().fg(theme.input_bar_text_fg).bg(theme.input_bar_background),
            ),
            InputMode::ComposingBulk => (
                "Message (Enter to send, Esc to cancel)".to_string(),
                format!("{}>", app.current_input),
                Style::default().fg(theme.input_bar_text_fg).bg(theme.input_bar_background),
            ),
            InputMode::Normal => {
                let hint = match app.active_view {
                    AppView::Logs => format!("{}/{} scroll", kb.up, kb.down),
                    AppView::Registry(_) => {
                        let search = app.active_table().map(|t| t.search().to_string()).unwrap_or_default();
                        if search.is_empty() {
                            format!(
                                "'{}' search, '{}' filter, 0-9 sort, '{}' toggle, '{}' select page",
                                kb.search, kb.filter, kb.toggle_select, kb.select_page
                            )
                        } else {
                            format!("search: {}", search)
                        }
                    }
                };
                (
                    format!("'{}' help, <{}>/<{}> switch views, '{}' quit", kb.help, kb.next_tab, kb.prev_tab, kb.quit),
                    hint,
                    Style::default().fg(theme.secondary_foreground).bg(theme.input_bar_background),
                )
            }
        };

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.input_bar_border))
            .title(Line::from(Span::styled(
                title_string,
                Style::default().fg(theme.primary_foreground).bg(theme.input_bar_background),
            )))
            .style(Style::default().bg(theme.input_bar_background));

        f.render_widget(Paragraph::new(text).style(input_style).block(input_block), area);
    }
}
