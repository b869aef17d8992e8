//! Enquiry form schema.
//!
//! The form the host renders for new-family registration is driven by this
//! schema so that the widget, the voice flow, and the validation logic all
//! agree on field keys, option values, and display labels.

use serde::{Deserialize, Serialize};

/// How a form field is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text input
    Text,
    /// Email input (validated to contain '@' before submission)
    Email,
    /// Telephone input
    Tel,
    /// Single selection from `options`
    Choice,
    /// Any number of selections from `options`
    MultiChoice,
}

/// A selectable option with the value sent to the backend and the label
/// shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One field of the enquiry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryField {
    /// Key into `EnquiryData` (camelCase, matches the wire payload)
    pub key: &'static str,
    /// Conversational question for this field
    pub question: &'static str,
    pub field_type: FieldType,
    /// Options for Choice/MultiChoice fields, empty otherwise
    pub options: Vec<FieldOption>,
}

fn opt(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption { value, label }
}

/// Returns the enquiry form fields in presentation order.
///
/// The five leading fields plus the three single-choice fields are required;
/// the four multi-choice interest categories are optional and feed the
/// personalised prospectus.
pub fn enquiry_fields() -> Vec<EnquiryField> {
    vec![
        EnquiryField {
            key: "parentName",
            question: "What is your name?",
            field_type: FieldType::Text,
            options: vec![],
        },
        EnquiryField {
            key: "firstName",
            question: "And what is your daughter's first name?",
            field_type: FieldType::Text,
            options: vec![],
        },
        EnquiryField {
            key: "familySurname",
            question: "What is your family surname?",
            field_type: FieldType::Text,
            options: vec![],
        },
        EnquiryField {
            key: "parentEmail",
            question: "What is your email address?",
            field_type: FieldType::Email,
            options: vec![],
        },
        EnquiryField {
            key: "contactNumber",
            question: "And your contact number?",
            field_type: FieldType::Tel,
            options: vec![],
        },
        EnquiryField {
            key: "ageGroup",
            question: "What age group is your daughter in?",
            field_type: FieldType::Choice,
            options: vec![
                opt("9-11", "Ages 9-11 (Years 5-6)"),
                opt("11-16", "Ages 11-16 (Years 7-11)"),
                opt("16-18", "Ages 16-18 (Sixth Form)"),
            ],
        },
        EnquiryField {
            key: "entryYear",
            question: "When are you planning for your daughter to join us?",
            field_type: FieldType::Choice,
            options: vec![
                opt("2025", "September 2025"),
                opt("2026", "September 2026"),
                opt("2027", "September 2027"),
                opt("2028", "September 2028"),
                opt("2029", "September 2029"),
            ],
        },
        EnquiryField {
            key: "hearAboutUs",
            question: "How did you hear about More House School?",
            field_type: FieldType::Choice,
            options: vec![
                opt("Website", "School Website"),
                opt("Search Engine", "Search Engine"),
                opt("Social Media", "Social Media"),
                opt("Word of Mouth", "Word of Mouth"),
                opt("Current Parent", "Current Parent"),
                opt("Open Day", "Open Day/Event"),
                opt("Other", "Other"),
            ],
        },
        EnquiryField {
            key: "academicInterests",
            question: "What are your daughter's academic interests? (Select all that apply)",
            field_type: FieldType::MultiChoice,
            options: vec![
                opt("sciences", "Sciences"),
                opt("mathematics", "Mathematics"),
                opt("english", "English & Literature"),
                opt("languages", "Modern Languages"),
                opt("humanities", "History & Geography"),
                opt("business", "Business Studies"),
            ],
        },
        EnquiryField {
            key: "creativeInterests",
            question: "What about creative and performance interests?",
            field_type: FieldType::MultiChoice,
            options: vec![
                opt("drama", "Drama & Theatre"),
                opt("music", "Music & Singing"),
                opt("art", "Art & Design"),
                opt("creative_writing", "Creative Writing"),
            ],
        },
        EnquiryField {
            key: "cocurricularInterests",
            question: "And co-curricular interests?",
            field_type: FieldType::MultiChoice,
            options: vec![
                opt("sport", "Sport & PE"),
                opt("leadership", "Leadership & Student Voice"),
                opt("community_service", "Community Service"),
                opt("outdoor_education", "Outdoor Education"),
            ],
        },
        EnquiryField {
            key: "familyPriorities",
            question: "Finally, what matters most to your family?",
            field_type: FieldType::MultiChoice,
            options: vec![
                opt("academic_excellence", "Academic Excellence"),
                opt("pastoral_care", "Outstanding Pastoral Care"),
                opt("university_preparation", "University Preparation"),
                opt("personal_development", "Personal Development"),
                opt("career_guidance", "Career Guidance"),
                opt("extracurricular_opportunities", "Extracurricular Opportunities"),
            ],
        },
    ]
}
