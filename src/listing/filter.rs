// src/listing/filter.rs

use std::collections::BTreeMap;
use std::fmt;

use super::value::{FieldValue, Record};
use super::ListFilter;

/// A single field-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// `record[field] == value`
    Equals(FieldValue),
    /// `record[field] >= min`
    AtLeast(f64),
    /// `record[field] < limit`
    Below(f64),
    /// Case-insensitive substring of the field's text form.
    Contains(String),
}

impl Criterion {
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            Criterion::Equals(expected) => value.loosely_eq(expected),
            Criterion::AtLeast(min) => value.as_number().map_or(false, |n| n >= *min),
            Criterion::Below(limit) => value.as_number().map_or(false, |n| n < *limit),
            Criterion::Contains(needle) => value
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// Conjunctive set of criteria keyed by field name. At most one criterion
/// per field; setting a field again replaces its criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: BTreeMap<String, Criterion>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, criterion: Criterion) -> Self {
        self.set(field, criterion);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, criterion: Criterion) {
        self.entries.insert(field.into(), criterion);
    }

    pub fn remove(&mut self, field: &str) -> Option<Criterion> {
        self.entries.remove(field)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, field: &str) -> Option<&Criterion> {
        self.entries.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Criterion)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Renders as filter expressions, e.g. `safety_score<60, status=active`.
impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, criterion)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match criterion {
                Criterion::Equals(value) => write!(f, "{}={}", field, value)?,
                Criterion::AtLeast(min) => write!(f, "{}>={}", field, min)?,
                Criterion::Below(limit) => write!(f, "{}<{}", field, limit)?,
                Criterion::Contains(needle) => write!(f, "{}~{}", field, needle)?,
            }
        }
        Ok(())
    }
}

/// True when `record` satisfies every criterion. Fields the record does not
/// have (or has no value for) never match.
pub fn matches<R: Record>(record: &R, criteria: &Criteria) -> bool {
    criteria.iter().all(|(field, criterion)| {
        record
            .field(field)
            .map_or(false, |value| criterion.accepts(&value))
    })
}

impl<R: Record> ListFilter<R> for Criteria {
    fn filter(&self, item: &R) -> bool {
        matches(item, self)
    }
}
