// src/listing/mod.rs
// Generic client-side list management shared by every registry view:
// filter -> search -> sort -> paginate, plus a selection set for bulk actions.

use std::cmp::Ordering;

pub mod controller;
pub mod filter;
pub mod paginate;
pub mod search;
pub mod selection;
pub mod sort;
pub mod value;

pub use controller::{run_pipeline, ListController, ListQuery, ListView};
pub use filter::{Criteria, Criterion};
pub use sort::SortSpec;
pub use value::{FieldKind, FieldSchema, FieldValue, Record};

/// A predicate stage of the list pipeline.
pub trait ListFilter<T> {
    fn filter(&self, item: &T) -> bool;
}

/// An ordering stage of the list pipeline. Implementations must be usable
/// with a stable sort: equal keys return `Ordering::Equal`.
pub trait ListSorter<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}
