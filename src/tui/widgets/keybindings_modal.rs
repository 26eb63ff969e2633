use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::tui::App;

pub struct KeybindingsModalWidget;

impl KeybindingsModalWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let theme = &app.theme;
        let popup_area = centered_rect(50, 70, area);
        f.render_widget(Clear, popup_area);
        let block = Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.popup_border))
            .style(Style::default().fg(theme.primary_foreground).bg(theme.popup_background))
            .title_alignment(Alignment::Center);
        f.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let kb = &app.config.keybindings;
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let entries: [(&str, &str); 23] = [
            ("Quit", kb.quit.as_str()),
            ("Help", kb.help.as_str()),
            ("Next Tab", kb.next_tab.as_str()),
            ("Prev Tab", kb.prev_tab.as_str()),
            ("Up", kb.up.as_str()),
            ("Down", kb.down.as_str()),
            ("Search", kb.search.as_str()),
            ("Filter", kb.filter.as_str()),
            ("Clear Filters", kb.clear_filters.as_str()),
            ("Sort by column", "1-9, 0"),
            ("Next Page", kb.next_page.as_str()),
            ("Prev Page", kb.prev_page.as_str()),
            ("Page Size", "+/-"),
            ("Toggle Row", kb.toggle_select.as_str()),
            ("Select Page", kb.select_page.as_str()),
            ("Clear Selection", kb.clear_selection.as_str()),
            ("Message Selected", kb.bulk_message.as_str()),
            ("Alert Selected", kb.bulk_alert.as_str()),
            ("Emergency Broadcast", kb.bulk_emergency.as_str()),
            ("Issue Digital ID", kb.issue_id.as_str()),
            ("Generate E-FIR", kb.generate_efir.as_str()),
            ("Cancel Task", kb.cancel_task.as_str()),
            ("Next Language", kb.cycle_language.as_str()),
        ];
        let mut lines: Vec<Line> = entries
            .iter()
            .map(|(action, key)| {
                Line::from(vec![Span::styled(format!("{}: ", action), bold), Span::raw(*key)])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Esc to close",
            Style::default().fg(theme.secondary_foreground),
        )));
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
    }
}
