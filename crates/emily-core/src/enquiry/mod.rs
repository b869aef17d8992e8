//! Enquiry (new-family registration) domain module.
//!
//! # Module Structure
//!
//! - `model`: collected enquiry data and verified-family records
//! - `fields`: the enquiry form schema (questions, option values and labels)
//! - `payload`: validation and prospectus-app payload formatting

mod fields;
mod model;
mod payload;

pub use fields::{EnquiryField, FieldOption, FieldType, enquiry_fields};
pub use model::{EnquiryData, VerifiedFamily, split_full_name};
