//! Create pipeline: structural validation, sanitization, skill normalization and numeric
//! coercion.
//!
//! Coercion details:
//! - an `experience` that does not parse as a number becomes `0` instead of failing
//!   ([`normalize`] on its own; structural validation rejects it first on the API path);
//! - duplicate skills are not removed;
//! - list skills are taken as-is, only comma-separated text is trimmed and lowercased.

use log::debug;

use crate::{
    errors::WorkerError,
    model::{InputValue, NewWorker, WorkerSubmission},
    sanitize::strip_markup,
    validators::validate_submission,
};

/// Validates `submission` and, only if it is structurally sound, normalizes it.
pub fn validate_and_normalize(submission: WorkerSubmission) -> Result<NewWorker, WorkerError> {
    validate_submission(&submission)?;
    normalize(submission)
}

/// Sanitizes and coerces a submission into a [`NewWorker`].
///
/// Fails only with [`WorkerError::NoSkills`].
pub fn normalize(submission: WorkerSubmission) -> Result<NewWorker, WorkerError> {
    let name = strip_markup(text_or_empty(submission.name.as_ref()).trim());
    let city = strip_markup(text_or_empty(submission.city.as_ref()).trim()).to_lowercase();
    let contact = Some(text_or_empty(submission.contact.as_ref()).trim().to_string()).filter(|c| !c.is_empty());

    let skills = normalize_skills(submission.skills.as_ref());
    if skills.is_empty() {
        debug!("rejecting worker submission without skills");
        return Err(WorkerError::NoSkills);
    }

    let experience = coerce_or_zero(submission.experience.as_ref());
    let ratings = submission.ratings.as_ref().map_or(0.0, InputValue::to_number);
    let distance = submission.distance.as_ref().map_or(0.0, InputValue::to_number);

    let photo = submission
        .photo
        .as_ref()
        .filter(|value| value.is_truthy())
        .map(|value| value.to_text().trim().to_string());
    let description = submission
        .description
        .as_ref()
        .filter(|value| value.is_truthy())
        .map(|value| strip_markup(&value.to_text()));

    Ok(NewWorker {
        name,
        contact,
        city,
        skills,
        experience,
        ratings,
        distance,
        photo,
        description,
    })
}

/// Canonical skill list: a list is used as-is, text is split on commas, trimmed and lowercased.
/// Falsy list entries (`null`, `false`, `0`) and empty entries are dropped; duplicates stay.
pub fn normalize_skills(value: Option<&InputValue>) -> Vec<String> {
    let skills: Vec<String> = match value {
        Some(InputValue::List(items)) => items
            .iter()
            .filter(|item| item.is_truthy())
            .map(InputValue::to_text)
            .collect(),
        Some(other) => other
            .to_text()
            .split(',')
            .map(|piece| piece.trim().to_lowercase())
            .collect(),
        None => Vec::new(),
    };

    skills.into_iter().filter(|skill| !skill.is_empty()).collect()
}

fn text_or_empty(value: Option<&InputValue>) -> String {
    value.map(InputValue::to_text).unwrap_or_default()
}

fn coerce_or_zero(value: Option<&InputValue>) -> f64 {
    let number = value.map_or(0.0, InputValue::to_number);
    if number.is_nan() { 0.0 } else { number }
}
