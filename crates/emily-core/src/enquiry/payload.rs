//! Enquiry validation and prospectus-app payload formatting.

use serde_json::{Map, Value, json};

use super::model::EnquiryData;

impl EnquiryData {
    /// Validates the form before submission.
    ///
    /// All scalar fields are required and the email must contain an '@'.
    /// Returns the user-facing corrective message on failure so the engine
    /// can reprompt without a backend round-trip.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            &self.parent_name,
            &self.first_name,
            &self.family_surname,
            &self.parent_email,
            &self.contact_number,
            &self.age_group,
            &self.entry_year,
            &self.hear_about_us,
        ];

        if required.iter().any(|value| value.trim().is_empty()) {
            return Err("Please fill in all required fields marked with *".to_string());
        }

        if !self.parent_email.contains('@') {
            return Err("Please enter a valid email address".to_string());
        }

        Ok(())
    }

    /// Formats the enquiry for the prospectus app webhook.
    ///
    /// Scalar fields keep their camelCase keys; each selected option across
    /// the four multi-choice categories becomes an individual `true` flag
    /// keyed by its option value. Unselected options do not appear at all.
    pub fn prospectus_payload(&self) -> Value {
        let mut payload = Map::new();

        payload.insert("parentName".into(), json!(self.parent_name));
        payload.insert("firstName".into(), json!(self.first_name));
        payload.insert("familySurname".into(), json!(self.family_surname));
        payload.insert("parentEmail".into(), json!(self.parent_email));
        payload.insert("contactNumber".into(), json!(self.contact_number));
        payload.insert("ageGroup".into(), json!(self.age_group));
        payload.insert("entryYear".into(), json!(self.entry_year));
        payload.insert("hearAboutUs".into(), json!(self.hear_about_us));

        let categories = [
            &self.academic_interests,
            &self.creative_interests,
            &self.cocurricular_interests,
            &self.family_priorities,
        ];
        for selections in categories {
            for value in selections {
                payload.insert(value.clone(), Value::Bool(true));
            }
        }

        Value::Object(payload)
    }
}
