//! Booking intent detection.
//!
//! Only explicit visit/tour/open-day booking phrases start the flow.
//! General "book" requests (e.g. "book a meeting with the registrar") are
//! left to the host's Q&A path, and informational questions about open days
//! must never be hijacked into a booking conversation.

/// Phrases that mark a message as asking ABOUT open days, not booking one.
/// These take precedence over booking phrases.
const INFO_QUERY_PHRASES: &[&str] = &[
    "when are",
    "when is",
    "what are",
    "what is",
    "tell me about",
    "do you have",
    "are there",
    "upcoming",
    "next",
    "dates",
];

/// Explicit booking phrases that start the flow.
const BOOKING_PHRASES: &[&str] = &[
    "book open day",
    "book an open day",
    "book the open day",
    "book a visit",
    "book a tour",
    "book a private tour",
    "i want to book a visit",
    "i would like to book a tour",
    "i'd like to book an open day",
    "reserve open day",
    "schedule open day",
    "schedule a visit",
    "come see the school",
    "come visit the school",
];

/// Returns true only if the message contains an explicit booking phrase and
/// no informational-query phrase. Informational phrases win even when a
/// booking phrase is also present, so "what are the dates to book a tour"
/// stays a question rather than a booking.
pub fn detect_booking_intent(message: &str) -> bool {
    let lower = message.trim().to_lowercase();

    if INFO_QUERY_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        tracing::debug!(message = %lower, "informational query, not booking intent");
        return false;
    }

    BOOKING_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_booking_phrases_match() {
        assert!(detect_booking_intent("I'd like to book a tour please"));
        assert!(detect_booking_intent("Book Open Day"));
        assert!(detect_booking_intent("  schedule a visit  "));
        assert!(detect_booking_intent("can we come see the school?"));
    }

    #[test]
    fn test_unrelated_text_does_not_match() {
        assert!(!detect_booking_intent("what uniform do the girls wear?"));
        assert!(!detect_booking_intent("book a meeting with the registrar"));
        assert!(!detect_booking_intent(""));
    }

    #[test]
    fn test_info_queries_suppress_booking_phrases() {
        // Contains "book a tour" but the informational phrase wins
        assert!(!detect_booking_intent("what are the dates to book a tour"));
        assert!(!detect_booking_intent("when is the next open day to book a visit"));
        assert!(!detect_booking_intent("tell me about booking a tour"));
        assert!(!detect_booking_intent("do you have upcoming open days"));
    }

    #[test]
    fn test_info_queries_alone_do_not_match() {
        assert!(!detect_booking_intent("when are your open days?"));
        assert!(!detect_booking_intent("are there any events in June"));
    }
}
