//! Enquiry domain models.

use serde::{Deserialize, Serialize};

/// Data collected from the new-family registration form.
///
/// Scalar fields are free text or single-choice values; the four interest
/// categories hold the option values the visitor ticked. Field names are
/// serialized in camelCase to match the widget form and the prospectus app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryData {
    pub parent_name: String,
    pub first_name: String,
    pub family_surname: String,
    pub parent_email: String,
    pub contact_number: String,
    pub age_group: String,
    pub entry_year: String,
    pub hear_about_us: String,
    #[serde(default)]
    pub academic_interests: Vec<String>,
    #[serde(default)]
    pub creative_interests: Vec<String>,
    #[serde(default)]
    pub cocurricular_interests: Vec<String>,
    #[serde(default)]
    pub family_priorities: Vec<String>,
}

impl EnquiryData {
    /// The parent's first name, taken as everything before the first space.
    pub fn parent_first_name(&self) -> &str {
        self.parent_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }
}

/// A previously-registered family returned by the verification endpoint.
///
/// Field names follow the backend's snake_case contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedFamily {
    /// Parent/guardian full name
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact_number: String,
    /// Student's first name
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_surname: String,
    #[serde(default)]
    pub age_group: String,
    /// Inquiry record linking this family to subsequent bookings
    pub inquiry_id: i64,
}

impl VerifiedFamily {
    /// Splits the parent's full name into (first, last) at the first space.
    /// The last name may be empty for single-word names.
    pub fn split_parent_name(&self) -> (String, String) {
        split_full_name(&self.name)
    }
}

/// Splits a full name into (first, rest) at the first space.
pub fn split_full_name(name: &str) -> (String, String) {
    match name.trim().split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}
