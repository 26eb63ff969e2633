// src/listing/controller.rs

use serde::Serialize;
use tracing::debug;

use super::filter::{Criteria, Criterion};
use super::paginate::paginate;
use super::search::SearchQuery;
use super::selection::SelectionSet;
use super::sort::{sort_records, SortSpec};
use super::value::Record;
use super::ListFilter;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// UI-driven parameters of one list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub criteria: Criteria,
    pub search: String,
    pub sort: Option<SortSpec>,
    pub page_size: usize,
    /// 1-based.
    pub page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            criteria: Criteria::new(),
            search: String::new(),
            sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// The renderable result of one pipeline run.
#[derive(Debug, Serialize)]
pub struct ListView<'a, R> {
    pub visible_records: Vec<&'a R>,
    pub total_filtered_count: usize,
    pub page_count: usize,
    pub current_page: usize,
}

impl<'a, R: Record> ListView<'a, R> {
    pub fn visible_ids(&self) -> Vec<R::Id> {
        self.visible_records.iter().map(|r| r.id()).collect()
    }
}

/// source -> filter -> search -> sort -> paginate. Pure; `source` is only
/// borrowed.
pub fn run_pipeline<'a, R: Record>(source: &'a [R], query: &ListQuery) -> ListView<'a, R> {
    let search = SearchQuery::for_record::<R>(&query.search);

    let mut matched: Vec<&'a R> = source
        .iter()
        .filter(|record| query.criteria.filter(*record))
        .filter(|record| search.filter(*record))
        .collect();

    if let Some(spec) = &query.sort {
        sort_records(&mut matched, spec);
    }

    let page = paginate(&matched, query.page_size, query.page);
    ListView {
        visible_records: page.items.to_vec(),
        total_filtered_count: matched.len(),
        page_count: page.page_count,
        current_page: page.current_page,
    }
}

/// Owns a source collection, the query state of its view and the selection
/// set. Every mutation keeps the stored page inside the valid range and the
/// selection inside the source.
#[derive(Debug, Clone)]
pub struct ListController<R: Record> {
    source: Vec<R>,
    query: ListQuery,
    selection: SelectionSet<R::Id>,
}

impl<R: Record> ListController<R> {
    pub fn new(source: Vec<R>) -> Self {
        Self::with_query(source, ListQuery::default())
    }

    pub fn with_query(source: Vec<R>, query: ListQuery) -> Self {
        let mut controller = Self {
            source,
            query,
            selection: SelectionSet::new(),
        };
        controller.reclamp_page();
        controller
    }

    pub fn view(&self) -> ListView<'_, R> {
        run_pipeline(&self.source, &self.query)
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn source(&self) -> &[R] {
        &self.source
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.source.iter().find(|r| &r.id() == id)
    }

    // --- query mutations ---

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.reclamp_page();
    }

    pub fn set_criterion(&mut self, field: impl Into<String>, criterion: Criterion) {
        self.query.criteria.set(field, criterion);
        self.reclamp_page();
    }

    pub fn remove_criterion(&mut self, field: &str) {
        if self.query.criteria.remove(field).is_some() {
            self.reclamp_page();
        }
    }

    pub fn clear_criteria(&mut self) {
        self.query.criteria.clear();
        self.reclamp_page();
    }

    /// Column-header semantics: same field toggles, new field ascends.
    pub fn sort_by(&mut self, field: &str) {
        let next = SortSpec::toggled(self.query.sort.as_ref(), field);
        debug!("Sorting by {} {:?}", next.field, next.direction);
        self.query.sort = Some(next);
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page;
        self.reclamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.query.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.query.page.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size.max(1);
        self.reclamp_page();
    }

    // --- selection ---

    /// Page-scoped select-all: the selection becomes the visible page.
    pub fn select_all_visible(&mut self) {
        let ids = self.view().visible_ids();
        self.selection.select_all(ids);
    }

    pub fn toggle_selected(&mut self, id: R::Id) -> bool {
        self.selection.toggle_one(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SelectionSet<R::Id> {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<R::Id> {
        self.selection.ids()
    }

    // --- source mutations ---

    pub fn replace_source(&mut self, source: Vec<R>) {
        self.source = source;
        self.after_source_change();
    }

    /// Replaces the record with the same id, or appends it.
    pub fn upsert(&mut self, record: R) {
        let id = record.id();
        match self.source.iter_mut().find(|r| r.id() == id) {
            Some(existing) => *existing = record,
            None => self.source.push(record),
        }
        self.after_source_change();
    }

    pub fn remove(&mut self, id: &R::Id) -> Option<R> {
        let index = self.source.iter().position(|r| &r.id() == id)?;
        let removed = self.source.remove(index);
        self.after_source_change();
        Some(removed)
    }

    fn after_source_change(&mut self) {
        let ids: Vec<R::Id> = self.source.iter().map(Record::id).collect();
        let dropped = self.selection.retain_present(ids.iter());
        if dropped > 0 {
            debug!("Dropped {} selected id(s) no longer in the source", dropped);
        }
        self.reclamp_page();
    }

    fn reclamp_page(&mut self) {
        self.query.page = self.view().current_page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::fixtures::{row, rows, Row};
    use crate::listing::sort::SortDirection;

    fn ids(view: &ListView<'_, Row>) -> Vec<u32> {
        view.visible_records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn pipeline_runs_filter_search_sort_then_paginate() {
        let source = rows();
        let query = ListQuery {
            criteria: Criteria::new().with("score", Criterion::AtLeast(40.0)),
            search: "e".to_string(),
            sort: Some(SortSpec::descending("score")),
            page_size: 2,
            page: 2,
        };
        let view = run_pipeline(&source, &query);
        // score >= 40: 1,2,3,4; all contain "e"; by score desc: 1,2,4,3
        assert_eq!(view.total_filtered_count, 4);
        assert_eq!(view.page_count, 2);
        assert_eq!(ids(&view), vec![4, 3]);
    }

    #[test]
    fn pipeline_does_not_mutate_the_source() {
        let source = rows();
        let query = ListQuery {
            sort: Some(SortSpec::ascending("name")),
            ..ListQuery::default()
        };
        let _ = run_pipeline(&source, &query);
        assert_eq!(source, rows());
    }

    #[test]
    fn narrowing_the_filter_clamps_the_stored_page() {
        let mut list = ListController::with_query(
            rows(),
            ListQuery {
                page_size: 2,
                ..ListQuery::default()
            },
        );
        list.set_page(3);
        assert_eq!(list.query().page, 3);
        list.set_search("delhi");
        assert_eq!(list.query().page, 1);
        assert_eq!(list.view().current_page, 1);
    }

    #[test]
    fn sort_by_toggles_on_the_same_field() {
        let mut list = ListController::new(rows());
        list.sort_by("score");
        assert_eq!(list.query().sort.as_ref().map(|s| s.direction), Some(SortDirection::Ascending));
        list.sort_by("score");
        assert_eq!(list.query().sort.as_ref().map(|s| s.direction), Some(SortDirection::Descending));
        list.sort_by("name");
        assert_eq!(list.query().sort, Some(SortSpec::ascending("name")));
    }

    #[test]
    fn select_all_is_scoped_to_the_visible_page() {
        let mut list = ListController::with_query(
            rows(),
            ListQuery {
                page_size: 2,
                page: 2,
                ..ListQuery::default()
            },
        );
        list.select_all_visible();
        assert_eq!(list.selected_ids(), vec![3, 4]);
    }

    #[test]
    fn removing_a_record_invalidates_its_selection() {
        let mut list = ListController::new(rows());
        list.toggle_selected(2);
        list.toggle_selected(5);
        let removed = list.remove(&2).map(|r| r.id);
        assert_eq!(removed, Some(2));
        assert!(!list.selection().contains(&2));
        assert_eq!(list.selected_ids(), vec![5]);
    }

    #[test]
    fn replacing_the_source_keeps_only_surviving_selections() {
        let mut list = ListController::new(rows());
        list.select_all_visible();
        list.replace_source(vec![row(1, "Asha", None, 1.0, ""), row(7, "New", None, 1.0, "")]);
        assert_eq!(list.selected_ids(), vec![1]);
    }

    #[test]
    fn upsert_replaces_by_id_and_appends_new_records() {
        let mut list = ListController::new(rows());
        list.upsert(row(1, "Asha R.", Some("Delhi"), 90.0, ""));
        list.upsert(row(6, "Farah", None, 50.0, ""));
        assert_eq!(list.source_len(), 6);
        assert_eq!(list.get(&1).map(|r| r.name), Some("Asha R."));
    }

    #[test]
    fn removing_records_from_the_last_page_clamps_it() {
        let mut list = ListController::with_query(
            rows(),
            ListQuery {
                page_size: 2,
                page: 3,
                ..ListQuery::default()
            },
        );
        assert_eq!(list.query().page, 3);
        list.remove(&5);
        assert_eq!(list.query().page, 2);
    }

    #[test]
    fn removing_a_criterion_widens_the_list() {
        let mut list = ListController::new(rows());
        list.set_criterion("score", Criterion::AtLeast(80.0));
        let narrowed = list.view().total_filtered_count;
        list.remove_criterion("score");
        assert!(list.view().total_filtered_count > narrowed);
        assert_eq!(list.view().total_filtered_count, list.source_len());
    }

    #[test]
    fn page_size_changes_reclamp_and_never_reach_zero() {
        let mut list = ListController::new(rows());
        list.set_page_size(1);
        list.set_page(list.source_len());
        assert_eq!(list.view().current_page, list.source_len());
        list.set_page_size(0);
        assert_eq!(list.query().page_size, 1);
        list.set_page_size(100);
        assert_eq!(list.query().page, 1);
    }

    #[test]
    fn page_navigation_stays_in_range() {
        let mut list = ListController::with_query(
            rows(),
            ListQuery {
                page_size: 2,
                ..ListQuery::default()
            },
        );
        list.prev_page();
        assert_eq!(list.query().page, 1);
        for _ in 0..10 {
            list.next_page();
        }
        assert_eq!(list.query().page, 3);
    }
}
