use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::tui::App;

/// One-line gauge for the running task. Renders nothing when idle.
pub struct TaskProgressWidget;

impl TaskProgressWidget {
    pub fn height(app: &App) -> u16 {
        if app.active_task.is_some() {
            3
        } else {
            0
        }
    }

    pub fn render(f: &mut Frame, app: &App, area: Rect) {
        let Some(task) = &app.active_task else {
            return;
        };
        let theme = &app.theme;
        let (label, percent) = match task.progress() {
            Some(progress) => (
                format!(
                    "{} ({}/{})  {}%",
                    progress.label, progress.step, progress.total_steps, progress.percent
                ),
                progress.percent,
            ),
            None => ("Finishing".to_string(), 100),
        };
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border_accent))
                    .title(format!("{} ('{}' to cancel)", task.name(), app.config.keybindings.cancel_task)),
            )
            .gauge_style(theme.gauge)
            .percent(u16::from(percent))
            .label(label);
        f.render_widget(gauge, area);
    }
}
