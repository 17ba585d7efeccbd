use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

/// Error type returned by worker stores.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The document violates the persisted worker schema.
    #[error("schema validation failed")]
    Schema(#[from] ValidationError),

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Unique constraint violation - the value(s) already exist on another entity.
    #[error("unique constraint violation: fields {fields:?} with values {values:?} already exist on entity '{existing_entity_id}'")]
    UniqueConstraintViolation {
        fields: Vec<String>,
        values: Vec<String>,
        existing_entity_id: String,
    },

    /// Invalid input supplied to a store operation (e.g. a filter pattern that does not compile).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

/// Collection of validation issues encountered while checking a submission.
#[derive(Debug, Clone, Error, Serialize)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `true` when one of the issues concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failure of the worker create pipeline.
///
/// Each variant corresponds to one response class of the create endpoint.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Structural validation failed; nothing was sanitized or persisted.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// The submitted skills normalized to an empty list.
    #[error("At least one skill required")]
    NoSkills,

    /// Another worker already owns the value of a unique field.
    #[error("duplicate value for {field}")]
    Conflict { field: String, value: String },

    /// Any other persistence failure.
    #[error("store error: {0}")]
    Store(RepoError),
}

impl From<RepoError> for WorkerError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueConstraintViolation { mut fields, mut values, .. } => WorkerError::Conflict {
                field: if fields.is_empty() { String::new() } else { fields.swap_remove(0) },
                value: if values.is_empty() { String::new() } else { values.swap_remove(0) },
            },
            other => WorkerError::Store(other),
        }
    }
}
