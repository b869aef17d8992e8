//! Booking session domain model.
//!
//! This module contains the mutable state of one visitor's booking
//! conversation. The session is owned exclusively by the dialogue engine;
//! hosts read it through accessors and interact only via `handle_message`.

use serde::{Deserialize, Serialize};

use super::stage::BookingStage;
use crate::enquiry::{EnquiryData, VerifiedFamily};
use crate::event::OpenDayEvent;

/// The kind of visit being booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    /// Scheduled, capacity-limited group visit (the default).
    #[default]
    OpenDay,
    /// Visitor-proposed date/time, confirmed later by admissions.
    PrivateTour,
}

impl BookingType {
    /// The wire value sent to the booking endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::OpenDay => "open_day",
            BookingType::PrivateTour => "private_tour",
        }
    }
}

/// Booking specifics collected step by step in `CollectingBookingDetails`.
///
/// Fields fill strictly in order: attendee count, then (private tours only)
/// preferred date and time, then special requirements. A `Some` value means
/// that step has been answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub num_attendees: Option<u32>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub special_requirements: Option<String>,
}

/// The state of one booking conversation.
///
/// Exactly one of `verified_family` / `enquiry_data` is authoritative for
/// contact and student details at submission time, selected by which path
/// the visitor took. `selected_event` is only ever set for open days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingSession {
    /// Current position in the state machine
    pub stage: BookingStage,
    /// Whether the visitor is a first-time enquirer (None until asked)
    pub is_new_family: Option<bool>,
    /// Populated only on successful verification of a returning family
    pub verified_family: Option<VerifiedFamily>,
    /// Populated only via the new-family registration form
    pub enquiry_data: Option<EnquiryData>,
    /// Chosen open-day event; never set for private tours
    pub selected_event: Option<OpenDayEvent>,
    pub booking_type: BookingType,
    pub booking_details: BookingDetails,
    /// Backend-issued enquiry identifier, once an enquiry exists
    pub inquiry_id: Option<i64>,
    pub prospectus_slug: Option<String>,
    pub prospectus_url: Option<String>,
    /// Open-day events fetched for this session; later `event_<id>`
    /// selections resolve against this cache, never a re-fetch
    pub available_events: Vec<OpenDayEvent>,
}

impl BookingSession {
    /// Creates a fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the session to its initial shape regardless of prior state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The parent's first name for conversational address, from whichever
    /// identity source is populated. Empty when neither is.
    pub fn parent_first_name(&self) -> String {
        if let Some(enquiry) = &self.enquiry_data {
            let first = enquiry.parent_first_name();
            if !first.is_empty() {
                return first.to_string();
            }
        }
        if let Some(family) = &self.verified_family {
            return family.split_parent_name().0;
        }
        String::new()
    }
}
