//! Worker entity and the request-side input schema.
//!
//! `WorkerSubmission` is what the create endpoint accepts: every field is optional and may carry
//! any JSON shape, so validation can report per-field problems instead of rejecting the body
//! outright. `NewWorker` is the normalized result, and `WorkerRecord` is what a store persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ValidationError, ValidationIssue, ValidationResult},
    search::Filterable,
};

pub const WORKER_COLLECTION: &str = "workers";

pub const FIELD_NAME: &str = "name";
pub const FIELD_CONTACT: &str = "contact";
pub const FIELD_CITY: &str = "city";
pub const FIELD_SKILLS: &str = "skills";
pub const FIELD_EXPERIENCE: &str = "experience";
pub const FIELD_RATINGS: &str = "ratings";
pub const FIELD_DISTANCE: &str = "distance";
pub const FIELD_PHOTO: &str = "photo";
pub const FIELD_DESCRIPTION: &str = "description";

pub const MAX_RATINGS: f64 = 5.0;
pub const MAX_EXPERIENCE: f64 = 100.0;

/// One field of a submission, in whatever shape the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<InputValue>),
    Other(serde_json::Value),
}

impl InputValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Renders the value as text the way a loosely typed form handler would.
    pub fn to_text(&self) -> String {
        match self {
            Self::Flag(flag) => flag.to_string(),
            Self::Number(number) => format_number(*number),
            Self::Text(text) => text.clone(),
            Self::List(items) => items.iter().map(InputValue::to_text).collect::<Vec<_>>().join(","),
            Self::Other(serde_json::Value::Null) => String::new(),
            Self::Other(serde_json::Value::Object(_)) => "[object Object]".to_string(),
            Self::Other(other) => other.to_string(),
        }
    }

    /// Numeric coercion: blank text is 0, unparsable text is NaN, flags are 1/0.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Flag(flag) => f64::from(u8::from(*flag)),
            Self::Number(number) => *number,
            Self::Text(text) => parse_number(text),
            Self::List(items) => match items.as_slice() {
                [] => 0.0,
                [single] => single.to_number(),
                _ => f64::NAN,
            },
            Self::Other(serde_json::Value::Null) => 0.0,
            Self::Other(_) => f64::NAN,
        }
    }

    /// Whether the value counts as "provided" for optional text fields.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::Text(text) => !text.is_empty(),
            Self::List(_) => true,
            Self::Other(serde_json::Value::Null) => false,
            Self::Other(_) => true,
        }
    }
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&trimmed[2..], radix);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')) => {
            trimmed.parse::<f64>().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Unsigned digits after a `0x`/`0o`/`0b` prefix; anything else (including a sign) is NaN.
fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
        .unwrap_or(f64::NAN)
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Raw create request body.
///
/// Unknown fields (including `isVerified`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkerSubmission {
    #[serde(default)]
    pub name: Option<InputValue>,
    #[serde(default)]
    pub contact: Option<InputValue>,
    #[serde(default)]
    pub city: Option<InputValue>,
    #[serde(default)]
    pub skills: Option<InputValue>,
    #[serde(default)]
    pub experience: Option<InputValue>,
    #[serde(default)]
    pub ratings: Option<InputValue>,
    #[serde(default)]
    pub distance: Option<InputValue>,
    #[serde(default)]
    pub photo: Option<InputValue>,
    #[serde(default)]
    pub description: Option<InputValue>,
}

impl WorkerSubmission {
    /// Builds a submission from url-encoded form pairs.
    ///
    /// `skills` becomes a list when it is repeated or sent as `skills[]`; every other field keeps
    /// its first occurrence.
    pub fn from_form_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut submission = Self::default();
        let mut skills: Vec<InputValue> = Vec::new();
        let mut skills_as_list = false;

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "skills[]" => {
                    skills_as_list = true;
                    skills.push(InputValue::Text(value));
                    continue;
                }
                FIELD_SKILLS => {
                    skills.push(InputValue::Text(value));
                    continue;
                }
                FIELD_NAME => &mut submission.name,
                FIELD_CONTACT => &mut submission.contact,
                FIELD_CITY => &mut submission.city,
                FIELD_EXPERIENCE => &mut submission.experience,
                FIELD_RATINGS => &mut submission.ratings,
                FIELD_DISTANCE => &mut submission.distance,
                FIELD_PHOTO => &mut submission.photo,
                FIELD_DESCRIPTION => &mut submission.description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(InputValue::Text(value));
            }
        }

        submission.skills = match skills.len() {
            0 => None,
            1 if !skills_as_list => skills.pop(),
            _ => Some(InputValue::List(skills)),
        };
        submission
    }
}

/// A validated, sanitized worker ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorker {
    pub name: String,
    pub contact: Option<String>,
    pub city: String,
    pub skills: Vec<String>,
    pub experience: f64,
    pub ratings: f64,
    pub distance: f64,
    pub photo: Option<String>,
    pub description: Option<String>,
}

/// Persisted worker document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub city: String,
    pub skills: Vec<String>,
    pub experience: i64,
    #[serde(with = "json_number")]
    pub ratings: f64,
    #[serde(with = "json_number")]
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl WorkerRecord {
    /// Assigns identity to a normalized worker after checking the persisted schema.
    ///
    /// Verification always starts out false.
    pub fn from_new(id: String, created_at: DateTime<Utc>, worker: NewWorker) -> ValidationResult<Self> {
        let mut issues = Vec::new();

        if worker.name.is_empty() {
            issues.push(ValidationIssue::new(FIELD_NAME, "required", "name is required"));
        }
        if worker.city.is_empty() {
            issues.push(ValidationIssue::new(FIELD_CITY, "required", "city is required"));
        }
        if worker.skills.is_empty() {
            issues.push(ValidationIssue::new(FIELD_SKILLS, "required", "skills are required"));
        }
        if !worker.experience.is_finite()
            || worker.experience.fract() != 0.0
            || !(0.0..=MAX_EXPERIENCE).contains(&worker.experience)
        {
            issues.push(ValidationIssue::new(
                FIELD_EXPERIENCE,
                "range",
                "experience must be an integer between 0 and 100",
            ));
        }
        if !(0.0..=MAX_RATINGS).contains(&worker.ratings) {
            issues.push(ValidationIssue::new(FIELD_RATINGS, "range", "ratings must be between 0 and 5"));
        }
        if !worker.distance.is_finite() {
            issues.push(ValidationIssue::new(FIELD_DISTANCE, "type", "distance must be a number"));
        }

        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }

        Ok(Self {
            id,
            name: worker.name,
            contact: worker.contact,
            city: worker.city,
            skills: worker.skills,
            experience: worker.experience as i64,
            ratings: worker.ratings,
            distance: worker.distance,
            photo: worker.photo,
            description: worker.description,
            is_verified: false,
            created_at,
        })
    }
}

impl Filterable for WorkerRecord {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            FIELD_NAME => Some(&self.name),
            FIELD_CITY => Some(&self.city),
            FIELD_CONTACT => self.contact.as_deref(),
            FIELD_PHOTO => self.photo.as_deref(),
            FIELD_DESCRIPTION => self.description.as_deref(),
            _ => None,
        }
    }

    fn list_field(&self, field: &str) -> Option<&[String]> {
        match field {
            FIELD_SKILLS => Some(&self.skills),
            _ => None,
        }
    }
}

/// Writes integral floats as JSON integers so `0` stays `0` on the wire.
pub(crate) mod json_number {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_new_worker() -> NewWorker {
        NewWorker {
            name: "Jo Painter".to_string(),
            contact: Some("555-0100".to_string()),
            city: "austin".to_string(),
            skills: vec!["painting".to_string()],
            experience: 4.0,
            ratings: 0.0,
            distance: 2.5,
            photo: None,
            description: None,
        }
    }

    #[test]
    fn submission_accepts_mixed_shapes() {
        let submission: WorkerSubmission = serde_json::from_value(json!({
            "name": "Jo",
            "skills": ["a", "b"],
            "experience": 3,
            "ratings": null,
            "isVerified": true,
            "city": {"nested": true}
        }))
        .expect("submission should deserialize");

        assert_eq!(submission.name, Some(InputValue::text("Jo")));
        assert_eq!(
            submission.skills,
            Some(InputValue::List(vec![InputValue::text("a"), InputValue::text("b")]))
        );
        assert_eq!(submission.experience, Some(InputValue::Number(3.0)));
        assert_eq!(submission.ratings, None);
        assert!(matches!(submission.city, Some(InputValue::Other(_))));
    }

    #[test]
    fn numeric_coercion_follows_loose_rules() {
        assert_eq!(InputValue::text("12").to_number(), 12.0);
        assert_eq!(InputValue::text(" 7 ").to_number(), 7.0);
        assert_eq!(InputValue::text("").to_number(), 0.0);
        assert!(InputValue::text("abc").to_number().is_nan());
        assert!(InputValue::text("inf").to_number().is_nan());
        assert_eq!(InputValue::text("0x1A").to_number(), 26.0);
        assert_eq!(InputValue::text("0b101").to_number(), 5.0);
        assert_eq!(InputValue::text(" 0o17 ").to_number(), 15.0);
        assert!(InputValue::text("0x").to_number().is_nan());
        assert!(InputValue::text("0xZ1").to_number().is_nan());
        assert!(InputValue::text("-0x1").to_number().is_nan());
        assert_eq!(InputValue::Flag(true).to_number(), 1.0);
        assert_eq!(InputValue::Number(2.5).to_number(), 2.5);
    }

    #[test]
    fn to_text_formats_numbers_without_trailing_zero() {
        assert_eq!(InputValue::Number(5.0).to_text(), "5");
        assert_eq!(InputValue::Number(5.5).to_text(), "5.5");
        assert_eq!(
            InputValue::List(vec![InputValue::text("a"), InputValue::Number(1.0)]).to_text(),
            "a,1"
        );
    }

    #[test]
    fn form_pairs_collect_repeated_skills() {
        let submission = WorkerSubmission::from_form_pairs(vec![
            ("name".to_string(), "Jo".to_string()),
            ("skills".to_string(), "plumbing".to_string()),
            ("skills".to_string(), "tiling".to_string()),
            ("name".to_string(), "ignored".to_string()),
        ]);
        assert_eq!(submission.name, Some(InputValue::text("Jo")));
        assert_eq!(
            submission.skills,
            Some(InputValue::List(vec![InputValue::text("plumbing"), InputValue::text("tiling")]))
        );
    }

    #[test]
    fn form_pairs_single_skill_stays_text() {
        let submission = WorkerSubmission::from_form_pairs(vec![("skills".to_string(), "a, b".to_string())]);
        assert_eq!(submission.skills, Some(InputValue::text("a, b")));

        let bracketed = WorkerSubmission::from_form_pairs(vec![("skills[]".to_string(), "a".to_string())]);
        assert_eq!(bracketed.skills, Some(InputValue::List(vec![InputValue::text("a")])));
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let created_at = Utc::now();
        let record = WorkerRecord::from_new("id1".to_string(), created_at, sample_new_worker()).expect("valid record");
        let value = serde_json::to_value(&record).expect("serializable");

        assert_eq!(value["_id"], json!("id1"));
        assert_eq!(value["isVerified"], json!(false));
        assert_eq!(value["ratings"], json!(0));
        assert_eq!(value["distance"], json!(2.5));
        assert_eq!(value["experience"], json!(4));
        assert!(value.get("photo").is_none());
        assert!(value.get("createdAt").is_some());

        let back: WorkerRecord = serde_json::from_value(value).expect("round trip");
        assert_eq!(back, record);
    }

    #[test]
    fn schema_rejects_out_of_range_ratings() {
        let mut worker = sample_new_worker();
        worker.ratings = 9.0;
        let err = WorkerRecord::from_new("id".to_string(), Utc::now(), worker).expect_err("ratings out of range");
        assert!(err.has_field(FIELD_RATINGS));
    }

    #[test]
    fn schema_rejects_empty_name() {
        let mut worker = sample_new_worker();
        worker.name = String::new();
        let err = WorkerRecord::from_new("id".to_string(), Utc::now(), worker).expect_err("empty name");
        assert!(err.has_field(FIELD_NAME));
    }
}
