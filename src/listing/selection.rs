// src/listing/selection.rs

use std::collections::BTreeSet;

/// Ids checked for bulk action. Independent of filter, sort and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<Id: Ord + Clone> {
    selected: BTreeSet<Id>,
}

impl<Id: Ord + Clone> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> SelectionSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection with exactly `visible_ids` (the current page).
    pub fn select_all<I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = Id>,
    {
        self.selected = visible_ids.into_iter().collect();
    }

    /// Returns true when `id` is selected afterwards.
    pub fn toggle_one(&mut self, id: Id) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops ids that are no longer in the source collection. Returns how
    /// many were dropped.
    pub fn retain_present<'a, I>(&mut self, source_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let present: BTreeSet<&Id> = source_ids.into_iter().collect();
        let before = self.selected.len();
        self.selected.retain(|id| present.contains(id));
        before - self.selected.len()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// Header-checkbox state: a non-empty page whose every id is selected.
    pub fn is_all_selected(&self, visible_ids: &[Id]) -> bool {
        !visible_ids.is_empty() && visible_ids.iter().all(|id| self.selected.contains(id))
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order, as handed to bulk actions.
    pub fn ids(&self) -> Vec<Id> {
        self.selected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_all_replaces_previous_selection() {
        let mut sel = SelectionSet::new();
        sel.toggle_one(9);
        sel.select_all(vec![3, 4]);
        assert_eq!(sel.ids(), vec![3, 4]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = SelectionSet::new();
        assert!(sel.toggle_one("zone_1"));
        assert!(sel.contains(&"zone_1"));
        assert!(!sel.toggle_one("zone_1"));
        assert!(sel.is_empty());
    }

    #[test]
    fn retain_present_drops_removed_ids() {
        let mut sel = SelectionSet::new();
        sel.select_all(vec![1, 2, 3]);
        let source = vec![1, 3, 4];
        assert_eq!(sel.retain_present(source.iter()), 1);
        assert_eq!(sel.ids(), vec![1, 3]);
    }

    #[test]
    fn header_state_requires_a_non_empty_fully_selected_page() {
        let mut sel = SelectionSet::new();
        assert!(!sel.is_all_selected(&[]));
        sel.select_all(vec![1, 2]);
        assert!(sel.is_all_selected(&[1, 2]));
        assert!(!sel.is_all_selected(&[1, 2, 3]));
    }
}
