// src/listing/search.rs

use super::value::{searchable_fields, Record};
use super::ListFilter;

/// Case-insensitive substring match over a whitelist of fields.
pub fn matches_query<R: Record>(record: &R, query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    contains_needle(record, &needle, fields)
}

fn contains_needle<R: Record>(record: &R, needle: &str, fields: &[&str]) -> bool {
    fields.iter().any(|field| {
        record
            .field(field)
            .map_or(false, |value| value.to_string().to_lowercase().contains(needle))
    })
}

/// A search stage with the query lowercased once per pipeline run.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    needle: String,
    fields: Vec<&'static str>,
}

impl SearchQuery {
    pub fn new(query: &str, fields: Vec<&'static str>) -> Self {
        Self {
            needle: query.to_lowercase(),
            fields,
        }
    }

    /// Uses every field `R` declares searchable.
    pub fn for_record<R: Record>(query: &str) -> Self {
        Self::new(query, searchable_fields::<R>())
    }
}

impl<R: Record> ListFilter<R> for SearchQuery {
    fn filter(&self, item: &R) -> bool {
        matches_query(item, &self.needle, &self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::fixtures::rows;

    #[test]
    fn empty_query_matches_everything() {
        assert!(rows().iter().all(|r| matches_query(r, "", &["name"])));
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let hits: Vec<u32> = rows()
            .iter()
            .filter(|r| matches_query(*r, "DELHI", &["city"]))
            .map(|r| r.id)
            .collect();
        assert_eq!(hits, vec![1, 4]);
    }

    #[test]
    fn any_whitelisted_field_may_match() {
        let query = SearchQuery::new("e", vec!["name", "city"]);
        let hits: Vec<u32> = rows().iter().filter(|r| query.filter(*r)).map(|r| r.id).collect();
        // Ben, Chen, Eli by name; Asha and Dara by "Delhi"/"delhi cantonment".
        assert_eq!(hits, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn absent_fields_are_skipped() {
        // Row 3 has no city; it can still match on name.
        assert!(matches_query(&rows()[2], "chen", &["city", "name"]));
        assert!(!matches_query(&rows()[2], "goa", &["city"]));
    }

    #[test]
    fn non_whitelisted_fields_are_ignored() {
        assert!(!rows().iter().any(|r| matches_query(r, "goa", &["name"])));
    }

    #[test]
    fn for_record_uses_declared_searchable_fields() {
        let query = SearchQuery::for_record::<crate::listing::fixtures::Row>("jaipur");
        let hits: Vec<u32> = rows().iter().filter(|r| query.filter(*r)).map(|r| r.id).collect();
        assert_eq!(hits, vec![5]);
    }
}
