//! Contact form validation
//!
//! Pure functions, no clock or environment access, so every rule is
//! directly unit-testable. The same email shape check runs on both
//! sides of the wire; the minimum-length rules are client-side only and
//! `validate_for_server` deliberately does not apply them (see
//! DESIGN.md on the asymmetry).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Basic `local@domain.tld` shape; anything stricter rejects real
/// addresses more often than it catches typos.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Transient contact request payload.
///
/// Fields default to empty strings so an absent JSON key and an empty
/// value both fail the same required-fields check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a single field value, returning an error message or `None`.
///
/// The raw value is trimmed before checking. Unrecognized field names
/// validate clean (permissive default).
pub fn validate_field(name: &str, raw: &str) -> Option<String> {
    let value = raw.trim();
    match name {
        "email" => {
            if value.is_empty() {
                Some("Email is required".to_string())
            } else if !is_valid_email(value) {
                Some("Please enter a valid email address".to_string())
            } else {
                None
            }
        }
        "firstName" => {
            if value.is_empty() {
                Some("First name is required".to_string())
            } else if value.chars().count() < 2 {
                Some("First name must be at least 2 characters".to_string())
            } else {
                None
            }
        }
        "lastName" => {
            if value.is_empty() {
                Some("Last name is required".to_string())
            } else if value.chars().count() < 2 {
                Some("Last name must be at least 2 characters".to_string())
            } else {
                None
            }
        }
        "message" => {
            if value.is_empty() {
                Some("Message is required".to_string())
            } else if value.chars().count() < 10 {
                Some("Message must be at least 10 characters".to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Whole-form validation: every failing field mapped to its message.
/// The submission pipeline proceeds only when the map is empty.
pub fn validate_form(submission: &ContactSubmission) -> BTreeMap<&'static str, String> {
    let mut errors = BTreeMap::new();
    for (name, value) in [
        ("email", &submission.email),
        ("firstName", &submission.first_name),
        ("lastName", &submission.last_name),
        ("message", &submission.message),
    ] {
        if let Some(msg) = validate_field(name, value) {
            errors.insert(name, msg);
        }
    }
    errors
}

/// Server-side input errors, in check order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerValidationError {
    MissingFields,
    InvalidEmail,
}

impl ServerValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            ServerValidationError::MissingFields => "All fields are required",
            ServerValidationError::InvalidEmail => "Invalid email address",
        }
    }
}

/// The server boundary enforces only two rules: all four fields present
/// (un-trimmed emptiness check) and a well-shaped email. Length rules
/// stay client-side.
pub fn validate_for_server(
    submission: &ContactSubmission,
) -> Result<(), ServerValidationError> {
    if submission.email.is_empty()
        || submission.first_name.is_empty()
        || submission.last_name.is_empty()
        || submission.message.is_empty()
    {
        return Err(ServerValidationError::MissingFields);
    }
    if !is_valid_email(&submission.email) {
        return Err(ServerValidationError::InvalidEmail);
    }
    Ok(())
}
