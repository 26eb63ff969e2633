// src/tui/table_source.rs
// Object-safe face of a registry view, so the table widget and key handling
// can drive any `ListController<R>` without knowing `R`.

use std::fmt::Display;

use crate::domain::Dataset;
use crate::listing::{Criteria, Criterion, FieldSchema, ListController, ListQuery, Record, SortSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
}

/// One rendered page of a registry.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub total_filtered: usize,
    pub source_len: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub current_page: usize,
    pub all_selected: bool,
}

pub trait TableSource {
    fn dataset(&self) -> Dataset;
    fn columns(&self) -> &'static [FieldSchema];
    fn page(&self) -> TablePage;
    fn search(&self) -> &str;
    fn set_search(&mut self, search: &str);
    fn criteria(&self) -> &Criteria;
    fn set_criterion(&mut self, field: &str, criterion: Criterion);
    fn remove_criterion(&mut self, field: &str);
    fn clear_criteria(&mut self);
    fn sort(&self) -> Option<&SortSpec>;
    /// Header-click semantics on the n-th column. False when the column
    /// does not exist or is not sortable.
    fn sort_by_column(&mut self, index: usize) -> bool;
    fn next_page(&mut self);
    fn prev_page(&mut self);
    fn set_page_size(&mut self, page_size: usize);
    fn cursor(&self) -> usize;
    fn move_cursor(&mut self, delta: isize);
    /// Toggles the row under the cursor. Returns whether it is now selected.
    fn toggle_cursor_row(&mut self) -> Option<bool>;
    fn select_page(&mut self);
    fn clear_selection(&mut self);
    fn selected_count(&self) -> usize;
}

pub struct RegistryTable<R: Record> {
    dataset: Dataset,
    pub list: ListController<R>,
    cursor: usize,
}

impl<R: Record> RegistryTable<R> {
    pub fn new(dataset: Dataset, records: Vec<R>, page_size: usize) -> Self {
        let query = ListQuery {
            sort: dataset.default_sort(),
            page_size: page_size.max(1),
            ..ListQuery::default()
        };
        Self {
            dataset,
            list: ListController::with_query(records, query),
            cursor: 0,
        }
    }

    /// The record under the cursor on the current page.
    pub fn cursor_record(&self) -> Option<&R> {
        let view = self.list.view();
        view.visible_records.get(self.cursor).copied()
    }

    fn visible_len(&self) -> usize {
        self.list.view().visible_records.len()
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible_len().saturating_sub(1));
    }
}

impl<R> TableSource for RegistryTable<R>
where
    R: Record,
    R::Id: Display,
{
    fn dataset(&self) -> Dataset {
        self.dataset
    }

    fn columns(&self) -> &'static [FieldSchema] {
        R::schema()
    }

    fn page(&self) -> TablePage {
        let view = self.list.view();
        let selection = self.list.selection();
        let ids = view.visible_ids();
        let rows = view
            .visible_records
            .iter()
            .map(|record| {
                let id = record.id();
                TableRow {
                    id: id.to_string(),
                    cells: R::schema()
                        .iter()
                        .map(|f| record.field(f.name).map(|v| v.to_string()).unwrap_or_default())
                        .collect(),
                    selected: selection.contains(&id),
                }
            })
            .collect();
        TablePage {
            rows,
            total_filtered: view.total_filtered_count,
            source_len: self.list.source_len(),
            page_size: self.list.query().page_size.max(1),
            page_count: view.page_count,
            current_page: view.current_page,
            all_selected: selection.is_all_selected(&ids),
        }
    }

    fn search(&self) -> &str {
        &self.list.query().search
    }

    fn set_search(&mut self, search: &str) {
        self.list.set_search(search);
        self.clamp_cursor();
    }

    fn criteria(&self) -> &Criteria {
        &self.list.query().criteria
    }

    fn set_criterion(&mut self, field: &str, criterion: Criterion) {
        self.list.set_criterion(field, criterion);
        self.clamp_cursor();
    }

    fn remove_criterion(&mut self, field: &str) {
        self.list.remove_criterion(field);
        self.clamp_cursor();
    }

    fn clear_criteria(&mut self) {
        self.list.clear_criteria();
        self.clamp_cursor();
    }

    fn sort(&self) -> Option<&SortSpec> {
        self.list.query().sort.as_ref()
    }

    fn sort_by_column(&mut self, index: usize) -> bool {
        match R::schema().get(index) {
            Some(field) if field.sortable => {
                self.list.sort_by(field.name);
                true
            }
            _ => false,
        }
    }

    fn next_page(&mut self) {
        self.list.next_page();
        self.clamp_cursor();
    }

    fn prev_page(&mut self) {
        self.list.prev_page();
        self.clamp_cursor();
    }

    fn set_page_size(&mut self, page_size: usize) {
        self.list.set_page_size(page_size);
        self.clamp_cursor();
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    fn toggle_cursor_row(&mut self) -> Option<bool> {
        let id = self.cursor_record()?.id();
        Some(self.list.toggle_selected(id))
    }

    fn select_page(&mut self) {
        self.list.select_all_visible();
    }

    fn clear_selection(&mut self) {
        self.list.clear_selection();
    }

    fn selected_count(&self) -> usize {
        self.list.selection().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{seed, Tourist};
    use chrono::Utc;

    fn tourists(page_size: usize) -> RegistryTable<Tourist> {
        let records: Vec<Tourist> = seed::tourists(Utc::now()).into_iter().take(6).collect();
        RegistryTable::new(Dataset::Tourists, records, page_size)
    }

    #[test]
    fn new_tables_start_with_the_dataset_default_sort() {
        let table = tourists(10);
        assert_eq!(table.sort(), Some(&SortSpec::descending("last_check_in")));
        // Michael Chen checked in most recently.
        assert_eq!(table.page().rows[0].id, "4");
    }

    #[test]
    fn cursor_stays_on_the_visible_page() {
        let mut table = tourists(2);
        table.move_cursor(5);
        assert_eq!(table.cursor(), 1);
        table.move_cursor(-9);
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn toggling_marks_the_row_selected() {
        let mut table = tourists(10);
        table.move_cursor(1);
        assert_eq!(table.toggle_cursor_row(), Some(true));
        let page = table.page();
        assert!(page.rows[1].selected);
        assert!(!page.all_selected);
        assert_eq!(table.selected_count(), 1);
    }

    #[test]
    fn select_page_sets_the_header_checkbox() {
        let mut table = tourists(2);
        table.next_page();
        table.select_page();
        let page = table.page();
        assert_eq!(page.current_page, 2);
        assert!(page.all_selected);
        assert_eq!(table.selected_count(), 2);
    }

    #[test]
    fn criteria_narrow_the_page_and_clamp_the_cursor() {
        let mut table = tourists(10);
        table.move_cursor(5);
        table.set_criterion("safety_score", Criterion::Below(60.0));
        assert_eq!(table.page().total_filtered, 2);
        assert_eq!(table.cursor(), 1);
        assert_eq!(table.criteria().to_string(), "safety_score<60");
        table.remove_criterion("safety_score");
        assert_eq!(table.page().total_filtered, 6);
        table.set_criterion("status", Criterion::Equals(crate::listing::FieldValue::text("active")));
        table.clear_criteria();
        assert!(table.criteria().is_empty());
    }

    #[test]
    fn only_sortable_columns_accept_a_sort() {
        let mut table = tourists(10);
        // column 3 is document_type, which is filter-only
        assert!(!table.sort_by_column(3));
        assert!(table.sort_by_column(6));
        assert_eq!(table.sort(), Some(&SortSpec::ascending("safety_score")));
        assert!(!table.sort_by_column(42));
    }

    #[test]
    fn shrinking_the_page_keeps_the_cursor_in_range() {
        let mut table = tourists(10);
        table.move_cursor(5);
        table.set_page_size(4);
        let page = table.page();
        assert_eq!(page.page_size, 4);
        assert_eq!(page.rows.len(), 4);
        assert_eq!(table.cursor(), 3);
    }

    #[test]
    fn searching_clamps_the_cursor() {
        let mut table = tourists(10);
        table.move_cursor(4);
        table.set_search("lotus");
        assert_eq!(table.page().rows.len(), 1);
        assert_eq!(table.cursor(), 0);
    }
}
