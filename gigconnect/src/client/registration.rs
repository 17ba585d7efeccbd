use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{InputValue, json_number};

/// Raw registration page inputs.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub primary_skill: String,
    pub city: String,
    pub experience: String,
    pub agreed_to_terms: bool,
}

/// Checks run before anything is sent, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter your full name.")]
    MissingName,
    #[error("Please enter phone or email as contact.")]
    MissingContact,
    #[error("Please enter at least one primary skill.")]
    MissingSkill,
    #[error("Please enter your city.")]
    MissingCity,
    #[error("Please enter a valid experience (years).")]
    InvalidExperience,
    #[error("You must agree to the Terms of Service & Privacy Policy.")]
    TermsNotAccepted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationPayload {
    pub name: String,
    pub contact: String,
    pub city: String,
    /// Primary skill text; the server splits it on commas.
    pub skills: String,
    #[serde(with = "json_number")]
    pub experience: f64,
    #[serde(with = "json_number")]
    pub ratings: f64,
    #[serde(with = "json_number")]
    pub distance: f64,
}

impl RegistrationForm {
    /// Trims every input and builds the request body, or reports the first failing check.
    ///
    /// Phone is preferred over email as the contact; a blank experience counts as zero.
    pub fn prepare(&self) -> Result<RegistrationPayload, FormError> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        let email = self.email.trim();
        let contact = if phone.is_empty() { email } else { phone };
        let primary_skill = self.primary_skill.trim();
        let city = self.city.trim();
        let experience_raw = self.experience.trim();
        let experience = if experience_raw.is_empty() {
            0.0
        } else {
            InputValue::text(experience_raw).to_number()
        };

        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if contact.is_empty() {
            return Err(FormError::MissingContact);
        }
        if primary_skill.is_empty() {
            return Err(FormError::MissingSkill);
        }
        if city.is_empty() {
            return Err(FormError::MissingCity);
        }
        if !experience.is_finite() || experience < 0.0 {
            return Err(FormError::InvalidExperience);
        }
        if !self.agreed_to_terms {
            return Err(FormError::TermsNotAccepted);
        }

        Ok(RegistrationPayload {
            name: name.to_string(),
            contact: contact.to_string(),
            city: city.to_string(),
            skills: primary_skill.to_string(),
            experience,
            ratings: 0.0,
            distance: 0.0,
        })
    }
}

/// What the registration page shows after the server answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Rejected { status: u16, message: String },
}

impl RegistrationOutcome {
    pub fn from_response(status: u16, body: &Value) -> Self {
        if status == 201 {
            return RegistrationOutcome::Registered;
        }

        let server_message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty());

        let message = match status {
            409 => server_message.unwrap_or("Contact already exists.").to_string(),
            422 => match body.get("errors").and_then(Value::as_array) {
                Some(errors) => {
                    let joined = errors
                        .iter()
                        .map(|issue| issue.get("message").and_then(Value::as_str).unwrap_or_default())
                        .collect::<Vec<_>>()
                        .join("; ");
                    if joined.is_empty() {
                        "Validation failed.".to_string()
                    } else {
                        joined
                    }
                }
                None => server_message.unwrap_or("Validation failed.").to_string(),
            },
            _ => server_message.unwrap_or("Registration failed. Try again.").to_string(),
        };

        RegistrationOutcome::Rejected { status, message }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationOutcome::Registered)
    }

    pub fn message(&self) -> &str {
        match self {
            RegistrationOutcome::Registered => "Registered successfully!",
            RegistrationOutcome::Rejected { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_form() -> RegistrationForm {
        RegistrationForm {
            name: " Jo Smith ".to_string(),
            email: "jo@example.com".to_string(),
            phone: " 555-0100 ".to_string(),
            primary_skill: "Plumbing, Tiling".to_string(),
            city: "Austin".to_string(),
            experience: "4".to_string(),
            agreed_to_terms: true,
        }
    }

    #[test]
    fn prepare_builds_trimmed_payload() {
        let payload = filled_form().prepare().expect("valid form");
        assert_eq!(payload.name, "Jo Smith");
        assert_eq!(payload.contact, "555-0100");
        assert_eq!(payload.skills, "Plumbing, Tiling");
        assert_eq!(
            serde_json::to_value(&payload).expect("serializes"),
            json!({
                "name": "Jo Smith",
                "contact": "555-0100",
                "city": "Austin",
                "skills": "Plumbing, Tiling",
                "experience": 4,
                "ratings": 0,
                "distance": 0
            })
        );
    }

    #[test]
    fn email_is_used_without_phone() {
        let form = RegistrationForm {
            phone: "   ".to_string(),
            ..filled_form()
        };
        assert_eq!(form.prepare().expect("valid").contact, "jo@example.com");
    }

    #[test]
    fn blank_experience_is_zero() {
        let form = RegistrationForm {
            experience: String::new(),
            ..filled_form()
        };
        assert_eq!(form.prepare().expect("valid").experience, 0.0);
    }

    #[test]
    fn checks_run_in_order() {
        let empty = RegistrationForm::default();
        assert_eq!(empty.prepare(), Err(FormError::MissingName));

        let no_contact = RegistrationForm {
            email: String::new(),
            phone: String::new(),
            city: String::new(),
            ..filled_form()
        };
        assert_eq!(no_contact.prepare(), Err(FormError::MissingContact));

        let no_city = RegistrationForm {
            city: " ".to_string(),
            experience: "-1".to_string(),
            ..filled_form()
        };
        assert_eq!(no_city.prepare(), Err(FormError::MissingCity));
    }

    #[test]
    fn invalid_experience_and_terms() {
        for experience in ["-1", "abc", "Infinity"] {
            let form = RegistrationForm {
                experience: experience.to_string(),
                ..filled_form()
            };
            assert_eq!(form.prepare(), Err(FormError::InvalidExperience), "{experience}");
        }

        let form = RegistrationForm {
            agreed_to_terms: false,
            ..filled_form()
        };
        assert_eq!(form.prepare(), Err(FormError::TermsNotAccepted));
        assert_eq!(
            FormError::TermsNotAccepted.to_string(),
            "You must agree to the Terms of Service & Privacy Policy."
        );
    }

    #[test]
    fn outcome_messages() {
        assert!(RegistrationOutcome::from_response(201, &json!({})).is_registered());

        let conflict = RegistrationOutcome::from_response(409, &json!({"message": "Duplicate key error"}));
        assert_eq!(conflict.message(), "Duplicate key error");
        assert_eq!(
            RegistrationOutcome::from_response(409, &Value::Null).message(),
            "Contact already exists."
        );

        let invalid = RegistrationOutcome::from_response(
            422,
            &json!({"errors": [
                {"field": "name", "code": "length", "message": "Name must be 2-100 characters"},
                {"field": "city", "code": "required", "message": "City is required"}
            ]}),
        );
        assert_eq!(invalid.message(), "Name must be 2-100 characters; City is required");
        assert_eq!(
            RegistrationOutcome::from_response(422, &json!({"message": "At least one skill required"})).message(),
            "At least one skill required"
        );
        assert_eq!(
            RegistrationOutcome::from_response(422, &json!({"errors": []})).message(),
            "Validation failed."
        );

        let failed = RegistrationOutcome::from_response(500, &json!({"message": "Error creating worker"}));
        assert_eq!(failed.message(), "Error creating worker");
        assert_eq!(
            RegistrationOutcome::from_response(502, &Value::Null).message(),
            "Registration failed. Try again."
        );
    }
}
