// src/listing/value.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Semantic type of a record field. Drives comparison and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Enum,
    Flag,
}

/// Declares one field a record exposes to the list pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub filterable: bool,
    pub searchable: bool,
    pub sortable: bool,
}

impl FieldSchema {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            filterable: false,
            searchable: false,
            sortable: false,
        }
    }

    pub const fn filterable(self) -> Self {
        Self { filterable: true, ..self }
    }

    pub const fn searchable(self) -> Self {
        Self { searchable: true, ..self }
    }

    pub const fn sortable(self) -> Self {
        Self { sortable: true, ..self }
    }
}

/// A field value as seen by the pipeline. Enum-kind fields carry their
/// lowercase variant name as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Flag(bool),
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Date(_) | FieldValue::Flag(_) => None,
        }
    }

    /// Interprets the value as a point in time. Text is accepted as RFC 3339,
    /// `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight UTC); numbers
    /// are unix milliseconds.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_timestamp(s),
            FieldValue::Number(n) => DateTime::from_timestamp_millis(*n as i64),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(s) => s.trim().parse::<bool>().ok(),
            FieldValue::Number(_) | FieldValue::Date(_) => None,
        }
    }

    /// Strict equality used by exact-match criteria. Mixed representations
    /// are compared after converting the text side.
    pub fn loosely_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Number(a), _) => other.as_number().map_or(false, |b| *a == b),
            (_, FieldValue::Number(b)) => self.as_number().map_or(false, |a| a == *b),
            (FieldValue::Date(a), _) => other.as_timestamp().map_or(false, |b| *a == b),
            (_, FieldValue::Date(b)) => self.as_timestamp().map_or(false, |a| a == *b),
            (FieldValue::Flag(a), _) => other.as_flag().map_or(false, |b| *a == b),
            (_, FieldValue::Flag(b)) => self.as_flag().map_or(false, |a| a == *b),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) if n.fract() == 0.0 => write!(f, "{:.0}", n),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format(TIMESTAMP_FORMAT)),
            FieldValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// An entity that can be listed. The pipeline only needs a stable id and
/// named access to the fields declared in `schema`.
pub trait Record {
    type Id: Ord + Clone + fmt::Debug;

    fn id(&self) -> Self::Id;

    fn schema() -> &'static [FieldSchema]
    where
        Self: Sized;

    /// `None` for unknown fields and for absent values.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

pub fn field_schema<R: Record>(name: &str) -> Option<&'static FieldSchema> {
    R::schema().iter().find(|f| f.name == name)
}

pub fn searchable_fields<R: Record>() -> Vec<&'static str> {
    R::schema()
        .iter()
        .filter(|f| f.searchable)
        .map(|f| f.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_the_audit_log_timestamp_format() {
        let parsed = parse_timestamp("2025-01-11 10:25:15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 11, 10, 25, 15).unwrap());
    }

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        assert_eq!(
            parse_timestamp("2024-03-18T14:30:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 3, 18, 14, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-02-10"),
            Some(Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn loose_equality_bridges_text_and_typed_values() {
        assert!(FieldValue::Number(60.0).loosely_eq(&FieldValue::text("60")));
        assert!(FieldValue::Flag(true).loosely_eq(&FieldValue::text("true")));
        assert!(!FieldValue::text("Active").loosely_eq(&FieldValue::text("active")));
        assert!(!FieldValue::Flag(false).loosely_eq(&FieldValue::Number(0.0)));
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(FieldValue::Number(85.0).to_string(), "85");
        assert_eq!(FieldValue::Number(28.6129).to_string(), "28.6129");
    }
}
