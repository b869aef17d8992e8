//! Admissions backend interface.
//!
//! Defines the contract the dialogue engine depends on for verification,
//! enquiry submission, event listing, and booking creation, decoupling the
//! engine from the HTTP transport (implemented in `emily-backend`).

use serde::{Deserialize, Serialize};

use crate::enquiry::VerifiedFamily;
use crate::error::Result;
use crate::event::OpenDayEvent;

/// Identifiers returned when an enquiry is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryOutcome {
    /// Backend-issued inquiry identifier linking the family to bookings
    pub inquiry_id: Option<i64>,
    /// Slug of the generated personalised prospectus
    pub slug: Option<String>,
    /// Full URL of the prospectus, if one was generated
    pub prospectus_url: Option<String>,
}

/// Payload for booking creation.
///
/// `event_id` is set exclusively for open days; `preferred_date` and
/// `preferred_time` are present (possibly empty, never null) exclusively
/// for private tours. Identity fields come from the verified family or the
/// enquiry form, whichever the session holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub school_id: i64,
    /// "open_day" or "private_tour"
    pub booking_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiry_id: Option<i64>,
    pub num_attendees: u32,
    pub special_requirements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    pub parent_first_name: String,
    pub parent_last_name: String,
    pub email: String,
    pub phone: String,
    pub student_first_name: String,
    pub student_last_name: String,
    pub age_group: String,
}

/// An abstract admissions backend.
///
/// This trait defines the four round-trips the booking flow performs,
/// decoupling the engine from the specific transport (HTTP in production,
/// an in-memory mock in tests). Every call is one independent
/// request/response exchange; the engine never issues more than one at a
/// time for a single visitor action.
#[async_trait::async_trait]
pub trait AdmissionsBackend: Send + Sync {
    /// Looks up a previously-registered family by email.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(family))`: family found
    /// - `Ok(None)`: not registered (not an error; the flow falls through
    ///   to new registration)
    /// - `Err(EmilyError)`: the lookup itself failed
    async fn verify_family(&self, email: &str) -> Result<Option<VerifiedFamily>>;

    /// Submits a new-family enquiry.
    ///
    /// `payload` is the flattened prospectus-app payload produced by
    /// `EnquiryData::prospectus_payload`. A backend-side rejection
    /// (`success: false`) is an `Err`, not a partial outcome.
    async fn submit_enquiry(&self, payload: &serde_json::Value) -> Result<EnquiryOutcome>;

    /// Lists all open-day events. Callers filter to upcoming dates.
    async fn list_events(&self) -> Result<Vec<OpenDayEvent>>;

    /// Creates a booking. A response without a booking record is an `Err`.
    async fn create_booking(&self, request: &BookingRequest) -> Result<serde_json::Value>;
}
