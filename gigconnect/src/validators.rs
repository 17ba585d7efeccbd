use crate::{
    errors::{ValidationError, ValidationIssue, ValidationResult},
    model::{FIELD_CITY, FIELD_EXPERIENCE, FIELD_NAME, FIELD_SKILLS, InputValue, WorkerSubmission},
};

pub const MIN_TEXT_LENGTH: usize = 2;
pub const MAX_TEXT_LENGTH: usize = 100;
pub const MIN_EXPERIENCE: i64 = 0;
pub const MAX_EXPERIENCE: i64 = 100;

/// Structural checks on a raw submission. Produces at most one issue per field.
pub fn validate_submission(submission: &WorkerSubmission) -> ValidationResult<()> {
    let issues: Vec<ValidationIssue> = [
        check_text_length(FIELD_NAME, submission.name.as_ref()),
        check_text_length(FIELD_CITY, submission.city.as_ref()),
        check_skills(submission.skills.as_ref()),
        check_experience(submission.experience.as_ref()),
    ]
    .into_iter()
    .flatten()
    .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(issues))
    }
}

/// Returns `true` if `value` is text whose trimmed length lies in `min..=max` characters.
pub fn is_text_with_length(value: &InputValue, min: usize, max: usize) -> bool {
    value
        .as_text()
        .is_some_and(|text| (min..=max).contains(&text.trim().chars().count()))
}

/// Returns `true` if `value` is an integer (or integer text) within `min..=max`.
pub fn is_int_in_range(value: &InputValue, min: i64, max: i64) -> bool {
    let parsed = match value {
        InputValue::Number(number) if number.is_finite() && number.fract() == 0.0 => Some(*number as i64),
        InputValue::Text(text) if is_integer_text(text) => text.parse::<i64>().ok(),
        _ => None,
    };
    parsed.is_some_and(|n| (min..=max).contains(&n))
}

fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn check_text_length(field: &str, value: Option<&InputValue>) -> Option<ValidationIssue> {
    match value {
        Some(value) if is_text_with_length(value, MIN_TEXT_LENGTH, MAX_TEXT_LENGTH) => None,
        Some(InputValue::Text(_)) => Some(ValidationIssue::new(
            field,
            "length",
            format!("{field} must be between {MIN_TEXT_LENGTH} and {MAX_TEXT_LENGTH} characters"),
        )),
        Some(_) => Some(ValidationIssue::new(field, "type", format!("{field} must be text"))),
        None => Some(ValidationIssue::new(field, "required", format!("{field} is required"))),
    }
}

fn check_skills(value: Option<&InputValue>) -> Option<ValidationIssue> {
    match value {
        Some(InputValue::Text(text)) if !text.trim().is_empty() => None,
        Some(InputValue::List(items)) if !items.is_empty() => None,
        _ => Some(ValidationIssue::new(FIELD_SKILLS, "required", "skills required")),
    }
}

fn check_experience(value: Option<&InputValue>) -> Option<ValidationIssue> {
    match value {
        Some(value) if is_int_in_range(value, MIN_EXPERIENCE, MAX_EXPERIENCE) => None,
        Some(_) => Some(ValidationIssue::new(
            FIELD_EXPERIENCE,
            "range",
            format!("experience must be an integer between {MIN_EXPERIENCE} and {MAX_EXPERIENCE}"),
        )),
        None => Some(ValidationIssue::new(FIELD_EXPERIENCE, "required", "experience is required")),
    }
}
