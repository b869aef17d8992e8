//! Booking stage types for session state management.

use serde::{Deserialize, Serialize};

/// A position in the booking state machine.
///
/// Stages constrain which visitor inputs are meaningful. Transitions move
/// strictly forward within one booking attempt; the only way back is a full
/// session reset, except that a failed verification deliberately redirects
/// into the new-registration path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    /// No booking in progress; watching for booking intent.
    #[default]
    Idle,
    /// Asked whether the family has registered before.
    AskingRegistration,
    /// Waiting for an email address to verify a returning family.
    VerifyingFamily,
    /// Waiting for the new-family enquiry form submission.
    CollectingEnquiry,
    /// Enquiry accepted; visitor may view the prospectus or continue.
    WaitingForProspectusView,
    /// Waiting for an open-day vs private-tour choice.
    ChoosingEventType,
    /// Upcoming open days listed; waiting for a selection.
    ShowingEvents,
    /// Gathering attendee count, (private tour) date/time, and requirements.
    CollectingBookingDetails,
    /// Booking submitted successfully. Further input falls through to the
    /// host's general Q&A; a fresh attempt requires an explicit reset.
    Completed,
}

impl BookingStage {
    /// Whether the `continue_booking` button is actionable in this stage.
    pub fn accepts_continue_booking(&self) -> bool {
        matches!(
            self,
            BookingStage::WaitingForProspectusView
                | BookingStage::ShowingEvents
                | BookingStage::ChoosingEventType
        )
    }

    /// Whether the booking flow has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStage::Completed)
    }
}
