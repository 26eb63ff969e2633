// src/listing/sort.rs

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::value::{field_schema, FieldKind, FieldValue, Record};
use super::ListSorter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// The single active column and direction of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Column-header click: the active field flips direction, any other
    /// field starts ascending.
    pub fn toggled(current: Option<&SortSpec>, field: &str) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec::new(field, spec.direction.toggle()),
            _ => SortSpec::ascending(field),
        }
    }
}

/// Orders two optional values of the given kind. Missing values, and values
/// that cannot be read as `kind`, sort before everything else.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>, kind: FieldKind) -> Ordering {
    match kind {
        FieldKind::Date => {
            let a = a.and_then(FieldValue::as_timestamp);
            let b = b.and_then(FieldValue::as_timestamp);
            a.cmp(&b)
        }
        FieldKind::Number => {
            let a = a.and_then(FieldValue::as_number);
            let b = b.and_then(FieldValue::as_number);
            match (a, b) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        FieldKind::Flag => {
            let a = a.and_then(FieldValue::as_flag);
            let b = b.and_then(FieldValue::as_flag);
            a.cmp(&b)
        }
        FieldKind::Text | FieldKind::Enum => {
            let a = a.map(|v| v.to_string());
            let b = b.map(|v| v.to_string());
            a.cmp(&b)
        }
    }
}

pub fn compare<R: Record>(a: &R, b: &R, field: &str, direction: SortDirection, kind: FieldKind) -> Ordering {
    let a = a.field(field);
    let b = b.field(field);
    direction.apply(compare_values(a.as_ref(), b.as_ref(), kind))
}

impl<R: Record> ListSorter<R> for SortSpec {
    /// Unknown or non-sortable fields compare equal, which leaves a stable
    /// sort's input order untouched.
    fn compare(&self, a: &R, b: &R) -> Ordering {
        match field_schema::<R>(&self.field) {
            Some(schema) if schema.sortable => compare(a, b, &self.field, self.direction, schema.kind),
            _ => Ordering::Equal,
        }
    }
}

/// Stable in-place sort of borrowed records.
pub fn sort_records<R: Record>(items: &mut [&R], spec: &SortSpec) {
    items.sort_by(|a, b| ListSorter::<R>::compare(spec, *a, *b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::fixtures::{row, rows, Row};

    fn sorted_ids(items: &[Row], spec: &SortSpec) -> Vec<u32> {
        let mut refs: Vec<&Row> = items.iter().collect();
        sort_records(&mut refs, spec);
        refs.iter().map(|r| r.id).collect()
    }

    #[test]
    fn dates_compare_chronologically() {
        assert_eq!(sorted_ids(&rows(), &SortSpec::ascending("seen")), vec![4, 5, 2, 1, 3]);
        assert_eq!(sorted_ids(&rows(), &SortSpec::descending("seen")), vec![3, 1, 2, 5, 4]);
    }

    #[test]
    fn numbers_compare_numerically_and_ties_keep_input_order() {
        // 2 and 4 share a score of 72.
        assert_eq!(sorted_ids(&rows(), &SortSpec::ascending("score")), vec![5, 3, 2, 4, 1]);
        assert_eq!(sorted_ids(&rows(), &SortSpec::descending("score")), vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn missing_values_are_sort_minimal() {
        assert_eq!(sorted_ids(&rows(), &SortSpec::ascending("city")).first(), Some(&3));
        assert_eq!(sorted_ids(&rows(), &SortSpec::descending("city")).last(), Some(&3));
    }

    #[test]
    fn text_order_is_by_code_point() {
        let items = vec![
            row(1, "b", None, 0.0, ""),
            row(2, "B", None, 0.0, ""),
            row(3, "a", None, 0.0, ""),
        ];
        assert_eq!(sorted_ids(&items, &SortSpec::ascending("name")), vec![2, 3, 1]);
    }

    #[test]
    fn unknown_field_is_a_no_op() {
        assert_eq!(sorted_ids(&rows(), &SortSpec::ascending("altitude")), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn equal_keys_keep_their_relative_order() {
        let items: Vec<Row> = (1..=8).map(|id| row(id, "same", None, 50.0, "")).collect();
        assert_eq!(
            sorted_ids(&items, &SortSpec::descending("score")),
            (1..=8).collect::<Vec<u32>>()
        );
    }

    #[test]
    fn toggling_the_active_field_flips_direction() {
        let first = SortSpec::toggled(None, "score");
        assert_eq!(first, SortSpec::ascending("score"));
        let second = SortSpec::toggled(Some(&first), "score");
        assert_eq!(second, SortSpec::descending("score"));
        let other = SortSpec::toggled(Some(&second), "name");
        assert_eq!(other, SortSpec::ascending("name"));
    }
}
