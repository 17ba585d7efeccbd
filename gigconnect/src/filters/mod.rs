//! Worker search filter construction.
//!
//! The search box semantics: `city` narrows results to one exact city, while `name` and `skill`
//! form a union (a record matches if its name or any of its skills contains the term).

pub mod normalizers;

pub use normalizers::*;

use crate::{
    model::{FIELD_CITY, FIELD_NAME, FIELD_SKILLS},
    search::FilterCondition,
};

/// Builds the worker search predicate from optional search terms.
///
/// Terms are trimmed here, so callers may pass raw query values. With no terms the result
/// matches every record.
pub fn build_filter(name_term: Option<&str>, skill_term: Option<&str>, city_term: Option<&str>) -> FilterCondition {
    let mut and_clauses = Vec::new();

    if let Some(city) = normalize_term(city_term) {
        and_clauses.push(FilterCondition::regex(FIELD_CITY, exact_pattern(city)));
    }

    let mut or_clauses = Vec::new();
    if let Some(name) = normalize_term(name_term) {
        or_clauses.push(FilterCondition::regex(FIELD_NAME, escape_regex(name)));
    }
    if let Some(skill) = normalize_term(skill_term) {
        or_clauses.push(FilterCondition::elem_match(FIELD_SKILLS, escape_regex(skill)));
    }
    if !or_clauses.is_empty() {
        and_clauses.push(FilterCondition::Or(or_clauses));
    }

    FilterCondition::And(and_clauses)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::model::WorkerRecord;

    fn worker(name: &str, city: &str, skills: &[&str]) -> WorkerRecord {
        WorkerRecord {
            id: name.to_string(),
            name: name.to_string(),
            contact: None,
            city: city.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: 1,
            ratings: 0.0,
            distance: 0.0,
            photo: None,
            description: None,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    fn matches(filter: &FilterCondition, record: &WorkerRecord) -> bool {
        filter.compile().expect("filter compiles").matches(record)
    }

    #[test]
    fn no_terms_matches_everything() {
        let filter = build_filter(None, Some("  "), Some(""));
        assert!(filter.is_match_all());
        assert_eq!(filter.to_document(), json!({}));
        assert!(matches(&filter, &worker("anyone", "anywhere", &["x"])));
    }

    #[test]
    fn city_is_exact_and_case_insensitive() {
        let filter = build_filter(None, None, Some("austin"));
        assert!(matches(&filter, &worker("a", " Austin ", &["x"])));
        assert!(matches(&filter, &worker("a", "AUSTIN", &["x"])));
        assert!(!matches(&filter, &worker("a", "austin heights", &["x"])));
        assert!(!matches(&filter, &worker("a", "east austin", &["x"])));
    }

    #[test]
    fn city_metacharacters_match_literally() {
        let filter = build_filter(None, None, Some("a.b"));
        assert!(matches(&filter, &worker("a", "a.b", &["x"])));
        assert!(!matches(&filter, &worker("a", "axb", &["x"])));

        let filter = build_filter(None, None, Some("st. louis (mo)"));
        assert!(matches(&filter, &worker("a", "St. Louis (MO)", &["x"])));
        assert!(!matches(&filter, &worker("a", "stX louis mo", &["x"])));
    }

    #[test]
    fn city_document_uses_anchored_escaped_pattern() {
        let filter = build_filter(None, None, Some("a.b"));
        assert_eq!(
            filter.to_document(),
            json!({ "$and": [ { "city": { "$regex": "^\\s*a\\.b\\s*$", "$options": "i" } } ] })
        );
    }

    #[test]
    fn name_and_skill_combine_with_or() {
        let filter = build_filter(Some("Jo"), Some("paint"), None);
        assert!(matches(&filter, &worker("Joe", "austin", &["plumbing"])));
        assert!(matches(&filter, &worker("Sam", "austin", &["house painting"])));
        assert!(!matches(&filter, &worker("Sam", "austin", &["plumbing"])));
    }

    #[test]
    fn city_restricts_the_name_skill_union() {
        let filter = build_filter(Some("Jo"), Some("paint"), Some("austin"));
        assert!(matches(&filter, &worker("Joe", "austin", &["plumbing"])));
        assert!(matches(&filter, &worker("Sam", "Austin", &["painting"])));
        assert!(!matches(&filter, &worker("Joe", "dallas", &["painting"])));
        assert!(!matches(&filter, &worker("Sam", "austin", &["plumbing"])));
    }

    #[test]
    fn name_alone_is_a_substring_match() {
        let filter = build_filter(Some("ann"), None, None);
        assert!(matches(&filter, &worker("Joanna", "x", &["y"])));
        assert!(!matches(&filter, &worker("Jo", "x", &["y"])));
    }

    #[test]
    fn skill_alone_checks_list_entries() {
        let filter = build_filter(None, Some("ELEC"), None);
        assert!(matches(&filter, &worker("a", "x", &["plumbing", "electrical"])));
        assert!(!matches(&filter, &worker("a", "x", &["plumbing"])));
    }

    #[test]
    fn name_and_skill_terms_are_escaped() {
        let filter = build_filter(Some("c++"), Some("c++"), None);
        assert!(filter.compile().is_ok());
        assert!(matches(&filter, &worker("c++ tutor", "x", &["y"])));
        assert!(!matches(&filter, &worker("ccc", "x", &["cc"])));

        let filter = build_filter(Some(".*"), None, None);
        assert!(!matches(&filter, &worker("anyone", "x", &["y"])));
    }
}
