//! # Filter predicates
//!
//! A [`FilterCondition`] is a small boolean tree over field matches. It is built once per
//! request (see [`crate::filters::build_filter`]) and consumed by a store in one of two forms:
//!
//! | Form                         | Produced by                     | Used for                          |
//! |------------------------------|---------------------------------|-----------------------------------|
//! | Mongo-style query document   | [`FilterCondition::to_document`] | logging, document-store backends  |
//! | [`CompiledFilter`]           | [`FilterCondition::compile`]     | evaluating records in process     |
//!
//! Leaf patterns are regular expressions matched case-insensitively. Callers are expected to
//! escape user text before it reaches a leaf; the tree itself does no escaping.
//!
//! ## Example
//!
//! ```text
//! city = "austin", name = "jo", skill = "jo"
//!
//! And([
//!     Regex { field: "city", pattern: "^\s*austin\s*$" },
//!     Or([
//!         Regex { field: "name", pattern: "jo" },
//!         ElemMatch { field: "skills", pattern: "jo" },
//!     ]),
//! ])
//! ```

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value as JsonValue, json};

use crate::errors::RepoError;

/// Read access to the fields a filter can target.
pub trait Filterable {
    /// Scalar text field value, `None` when the field is unset or unknown.
    fn text_field(&self, field: &str) -> Option<&str>;

    /// List-of-text field value, `None` when the field is unknown.
    fn list_field(&self, field: &str) -> Option<&[String]>;
}

/// A composable filter condition.
///
/// An empty `And` matches every record; an empty `Or` matches none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    /// Case-insensitive regex against a scalar text field.
    Regex { field: String, pattern: String },
    /// At least one entry of a list field matches the case-insensitive regex.
    ElemMatch { field: String, pattern: String },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
}

impl FilterCondition {
    #[inline]
    pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Regex {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    #[inline]
    pub fn elem_match(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::ElemMatch {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    #[inline]
    pub fn and(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::And(conditions.into_iter().collect())
    }

    #[inline]
    pub fn or(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::Or(conditions.into_iter().collect())
    }

    /// The predicate matching every record.
    #[inline]
    pub fn match_all() -> Self {
        Self::And(Vec::new())
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::And(conditions) if conditions.is_empty())
    }

    /// Render as a Mongo-style query document.
    ///
    /// The match-all predicate renders as `{}`.
    pub fn to_document(&self) -> JsonValue {
        match self {
            Self::Regex { field, pattern } => {
                let mut doc = Map::new();
                doc.insert(field.clone(), json!({ "$regex": pattern, "$options": "i" }));
                JsonValue::Object(doc)
            }
            Self::ElemMatch { field, pattern } => {
                let mut doc = Map::new();
                doc.insert(
                    field.clone(),
                    json!({ "$elemMatch": { "$regex": pattern, "$options": "i" } }),
                );
                JsonValue::Object(doc)
            }
            Self::And(conditions) if conditions.is_empty() => JsonValue::Object(Map::new()),
            Self::And(conditions) => {
                json!({ "$and": conditions.iter().map(FilterCondition::to_document).collect::<Vec<_>>() })
            }
            Self::Or(conditions) => {
                json!({ "$or": conditions.iter().map(FilterCondition::to_document).collect::<Vec<_>>() })
            }
        }
    }

    /// Compile every leaf pattern so the filter can be evaluated repeatedly.
    pub fn compile(&self) -> Result<CompiledFilter, RepoError> {
        Ok(match self {
            Self::Regex { field, pattern } => CompiledFilter::Regex {
                field: field.clone(),
                regex: compile_pattern(pattern)?,
            },
            Self::ElemMatch { field, pattern } => CompiledFilter::ElemMatch {
                field: field.clone(),
                regex: compile_pattern(pattern)?,
            },
            Self::And(conditions) => {
                CompiledFilter::And(conditions.iter().map(FilterCondition::compile).collect::<Result<_, _>>()?)
            }
            Self::Or(conditions) => {
                CompiledFilter::Or(conditions.iter().map(FilterCondition::compile).collect::<Result<_, _>>()?)
            }
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, RepoError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| RepoError::InvalidRequest {
            message: format!("Invalid filter pattern {pattern:?}: {err}"),
        })
}

/// A [`FilterCondition`] with its patterns compiled.
#[derive(Debug, Clone)]
pub enum CompiledFilter {
    Regex { field: String, regex: Regex },
    ElemMatch { field: String, regex: Regex },
    And(Vec<CompiledFilter>),
    Or(Vec<CompiledFilter>),
}

impl CompiledFilter {
    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        match self {
            Self::Regex { field, regex } => record.text_field(field).is_some_and(|value| regex.is_match(value)),
            Self::ElemMatch { field, regex } => record
                .list_field(field)
                .is_some_and(|values| values.iter().any(|value| regex.is_match(value))),
            Self::And(conditions) => conditions.iter().all(|c| c.matches(record)),
            Self::Or(conditions) => conditions.iter().any(|c| c.matches(record)),
        }
    }
}
