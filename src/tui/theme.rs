use ratatui::style::{Color, Modifier, Style};

use crate::domain::{IncidentStatus, RiskLevel, Severity, TouristStatus};

#[derive(Debug, Clone)]
pub struct AppTheme {
    // General
    pub primary_background: Color,
    pub primary_foreground: Color,
    pub secondary_foreground: Color,
    pub border_primary: Color,
    pub border_accent: Color,
    pub highlight_style: Style, // cursor row
    pub error_text: Color,
    pub warning_text: Color,
    pub success_text: Color,
    pub info_text: Color,

    // Status Bar
    pub status_bar_background: Color,
    pub status_bar_foreground: Color,
    pub status_bar_mode_normal_bg: Color,
    pub status_bar_mode_searching_bg: Color,
    pub status_bar_mode_filtering_bg: Color,
    pub status_bar_mode_composing_bg: Color,
    pub status_bar_view_name_fg: Color,

    // Input Bar
    pub input_bar_background: Color,
    pub input_bar_text_fg: Color,
    pub input_bar_border: Color,

    // Record Table
    pub table_title: Style,
    pub table_header: Style,
    pub table_sorted_header: Style,
    pub table_selected_row: Style,
    pub table_footer: Style,

    // Log View
    pub log_level_trace: Style,
    pub log_level_debug: Style,
    pub log_level_info: Style,
    pub log_level_warn: Style,
    pub log_level_error: Style,
    pub log_timestamp: Style,
    pub log_target: Style,

    // Popup
    pub popup_border: Color,
    pub popup_background: Color,
    pub gauge: Style,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // General
            primary_background: Color::Reset,
            primary_foreground: Color::White,
            secondary_foreground: Color::Gray,
            border_primary: Color::DarkGray,
            border_accent: Color::Cyan,
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            error_text: Color::Red,
            warning_text: Color::Yellow,
            success_text: Color::Green,
            info_text: Color::Cyan,

            // Status Bar
            status_bar_background: Color::Blue,
            status_bar_foreground: Color::White,
            status_bar_mode_normal_bg: Color::LightCyan,
            status_bar_mode_searching_bg: Color::LightMagenta,
            status_bar_mode_filtering_bg: Color::LightYellow,
            status_bar_mode_composing_bg: Color::LightGreen,
            status_bar_view_name_fg: Color::Yellow,

            // Input Bar
            input_bar_background: Color::DarkGray,
            input_bar_text_fg: Color::White,
            input_bar_border: Color::White,

            // Record Table
            table_title: Style::default().fg(Color::LightCyan).add_modifier(Modifier::BOLD),
            table_header: Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            table_sorted_header: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            table_selected_row: Style::default().fg(Color::LightGreen),
            table_footer: Style::default().fg(Color::DarkGray),

            // Log View
            log_level_trace: Style::default().fg(Color::Magenta),
            log_level_debug: Style::default().fg(Color::Green),
            log_level_info: Style::default().fg(Color::Cyan),
            log_level_warn: Style::default().fg(Color::Yellow),
            log_level_error: Style::default().fg(Color::Red),
            log_timestamp: Style::default().fg(Color::DarkGray),
            log_target: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),

            // Popup
            popup_border: Color::Yellow,
            popup_background: Color::Black,
            gauge: Style::default().fg(Color::LightGreen).bg(Color::DarkGray),
        }
    }
}

impl AppTheme {
    /// Colour for a status or severity cell, keyed on its lowercase value.
    pub fn cell_color(&self, value: &str) -> Option<Color> {
        let color = match value {
            v if v == TouristStatus::Active.as_str() => self.success_text,
            v if v == TouristStatus::Emergency.as_str() || v == TouristStatus::Missing.as_str() => {
                self.error_text
            }
            v if v == Severity::Critical.as_str() || v == RiskLevel::High.as_str() => self.error_text,
            v if v == Severity::Medium.as_str() || v == RiskLevel::Moderate.as_str() => self.warning_text,
            v if v == IncidentStatus::Investigating.as_str() => self.info_text,
            v if v == IncidentStatus::Resolved.as_str() => self.success_text,
            _ => return None,
        };
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cells_get_signal_colours() {
        let theme = AppTheme::default();
        assert_eq!(theme.cell_color("emergency"), Some(Color::Red));
        assert_eq!(theme.cell_color("moderate"), Some(Color::Yellow));
        assert_eq!(theme.cell_color("Raj Patel"), None);
    }
}
