use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::services::BulkActionKind;
use crate::tui::App;

/// Compose form for a bulk message, alert or emergency broadcast.
pub struct BulkActionPopupWidget;

impl BulkActionPopupWidget {
    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let Some(draft) = app.bulk_draft else {
            return;
        };
        let theme = &app.theme;
        let popup_area = centered_rect(60, 40, area);

        let block = Block::default()
            .title(format!(
                "{} ({} tourists)",
                draft.kind.title(),
                app.tourists.list.selection().len()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_accent))
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(theme.popup_background));
        f.render_widget(Clear, popup_area);
        f.render_widget(block.clone(), popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Alert type
                Constraint::Length(1), // Priority
                Constraint::Min(3),    // Message
                Constraint::Length(1), // Instructions
            ])
            .split(block.inner(popup_area));

        let label = Style::default().add_modifier(Modifier::BOLD);
        let dimmed = Style::default().fg(theme.secondary_foreground);
        let option_style = if draft.kind == BulkActionKind::Alert { Style::default() } else { dimmed };

        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Alert type: ", label),
                Span::styled(format!("{:?}", draft.alert_type), option_style),
            ])),
            chunks[0],
        );
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Priority:   ", label),
                Span::styled(format!("{:?}", draft.priority), option_style),
            ])),
            chunks[1],
        );
        f.render_widget(
            Paragraph::new(format!("{}_", app.current_input))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Message")),
            chunks[2],
        );
        f.render_widget(
            Paragraph::new("Enter send | Esc cancel | Tab alert type | Shift+Tab priority").style(dimmed),
            chunks[3],
        );
    }
}
