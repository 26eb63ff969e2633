// src/tui/widgets/record_table.rs
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::listing::{FieldSchema, SortSpec};
use crate::text::{display_width, truncate_to_width};
use crate::tui::app::App;
use crate::tui::table_source::{TablePage, TableSource};

const COL_CHECKBOX: u16 = 3;
const MAX_COLUMN_WIDTH: usize = 28;

pub struct RecordTableWidget;

impl RecordTableWidget {
    pub fn render(f: &mut Frame, app: &App, table: &dyn TableSource, area: Rect) {
        let theme = &app.theme;
        let page = table.page();
        let columns = table.columns();

        let title = Line::from(vec![
            Span::styled(format!(" {} ", table.dataset().title()), theme.table_title),
            Span::raw(title_suffix(table, &page)),
        ]);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_primary));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(block.inner(area));
        f.render_widget(block, area);

        if page.rows.is_empty() {
            f.render_widget(
                Paragraph::new("No matching records.")
                    .style(Style::default().fg(theme.secondary_foreground))
                    .alignment(Alignment::Center),
                chunks[0],
            );
        } else {
            let widths = column_widths(columns, table.sort(), &page);
            let mut header_cells = vec![Cell::from(checkbox(page.all_selected))];
            header_cells.extend(columns.iter().map(|field| {
                let style = match table.sort() {
                    Some(spec) if spec.field == field.name => theme.table_sorted_header,
                    _ => theme.table_header,
                };
                Cell::from(header_label(field, table.sort())).style(style)
            }));

            let rows = page.rows.iter().map(|row| {
                let mut cells = vec![Cell::from(checkbox(row.selected))];
                cells.extend(row.cells.iter().zip(&widths).map(|(value, width)| {
                    let cell = Cell::from(truncate_to_width(value, *width as usize));
                    match theme.cell_color(value) {
                        Some(color) => cell.style(Style::default().fg(color)),
                        None => cell,
                    }
                }));
                let row_widget = Row::new(cells);
                if row.selected {
                    row_widget.style(theme.table_selected_row)
                } else {
                    row_widget
                }
            });

            let mut constraints = vec![Constraint::Length(COL_CHECKBOX)];
            constraints.extend(widths.iter().map(|w| Constraint::Length(*w)));

            let table_widget = Table::new(rows, constraints)
                .header(Row::new(header_cells))
                .highlight_style(theme.highlight_style)
                .column_spacing(1);

            let mut state = TableState::default();
            state.select(Some(table.cursor()));
            f.render_stateful_widget(table_widget, chunks[0], &mut state);
        }

        f.render_widget(
            Paragraph::new(footer_text(&page)).style(theme.table_footer),
            chunks[1],
        );
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn header_label(field: &FieldSchema, sort: Option<&SortSpec>) -> String {
    match sort {
        Some(spec) if spec.field == field.name => format!("{} {}", field.label, spec.direction.arrow()),
        _ => field.label.to_string(),
    }
}

fn title_suffix(table: &dyn TableSource, page: &TablePage) -> String {
    let mut parts = Vec::new();
    if !table.search().is_empty() {
        parts.push(format!("search: \"{}\"", table.search()));
    }
    if !table.criteria().is_empty() {
        parts.push(format!("filter: {}", table.criteria()));
    }
    if table.selected_count() > 0 {
        parts.push(format!("{} selected", table.selected_count()));
    }
    if page.total_filtered != page.source_len {
        parts.push(format!("{} of {} match", page.total_filtered, page.source_len));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("[{}] ", parts.join(" | "))
    }
}

pub fn footer_text(page: &TablePage) -> String {
    if page.rows.is_empty() {
        return format!("Page {} of {}  (0 records)", page.current_page, page.page_count);
    }
    let first = (page.current_page - 1) * page.page_size + 1;
    let last = first + page.rows.len() - 1;
    format!(
        "Page {} of {}  ({}-{} of {})",
        page.current_page, page.page_count, first, last, page.total_filtered
    )
}

/// Width of each data column: the widest of label and cells, capped.
fn column_widths(columns: &[FieldSchema], sort: Option<&SortSpec>, page: &TablePage) -> Vec<u16> {
    columns
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let header = display_width(&header_label(field, sort));
            let widest_cell = page
                .rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| display_width(cell))
                .max()
                .unwrap_or(0);
            header.max(widest_cell).min(MAX_COLUMN_WIDTH) as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::table_source::TableRow;

    fn page(rows: usize, current_page: usize, page_count: usize, total: usize, page_size: usize) -> TablePage {
        TablePage {
            rows: (0..rows)
                .map(|i| TableRow {
                    id: i.to_string(),
                    cells: vec![format!("row {}", i)],
                    selected: false,
                })
                .collect(),
            total_filtered: total,
            source_len: total,
            page_size,
            page_count,
            current_page,
            all_selected: false,
        }
    }

    #[test]
    fn footer_reports_the_record_range() {
        assert_eq!(footer_text(&page(2, 1, 3, 6, 2)), "Page 1 of 3  (1-2 of 6)");
        assert_eq!(footer_text(&page(1, 3, 3, 5, 2)), "Page 3 of 3  (5-5 of 5)");
        assert_eq!(footer_text(&page(0, 1, 1, 0, 10)), "Page 1 of 1  (0 records)");
    }

    #[test]
    fn title_lists_active_filters() {
        use crate::domain::{seed, Dataset, Tourist};
        use crate::listing::Criterion;
        use crate::tui::table_source::RegistryTable;

        let records: Vec<Tourist> = seed::tourists(chrono::Utc::now()).into_iter().take(6).collect();
        let mut table = RegistryTable::new(Dataset::Tourists, records, 10);
        table.set_criterion("safety_score", Criterion::Below(60.0));
        let page = table.page();
        assert_eq!(title_suffix(&table, &page), "[filter: safety_score<60 | 2 of 6 match] ");
    }

    #[test]
    fn sorted_headers_carry_an_arrow() {
        let field = FieldSchema::new("name", "Name", crate::listing::FieldKind::Text);
        assert_eq!(header_label(&field, Some(&SortSpec::descending("name"))), "Name ▼");
        assert_eq!(header_label(&field, Some(&SortSpec::ascending("status"))), "Name");
    }

    #[test]
    fn column_widths_are_capped() {
        let field = FieldSchema::new("name", "Name", crate::listing::FieldKind::Text);
        let mut p = page(1, 1, 1, 1, 10);
        p.rows[0].cells[0] = "x".repeat(80);
        assert_eq!(column_widths(&[field], None, &p), vec![MAX_COLUMN_WIDTH as u16]);
    }
}
