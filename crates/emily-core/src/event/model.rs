//! Open-day event domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scheduled, capacity-limited open-day event.
///
/// Events are fetched from the admissions backend and cached on the booking
/// session so that a later selection resolves against the list the visitor
/// actually saw, not a fresh fetch that may have changed underneath them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenDayEvent {
    /// Backend-issued event identifier
    pub id: i64,
    /// Event title (e.g., "Autumn Open Morning")
    pub title: String,
    /// Calendar date of the event
    pub event_date: NaiveDate,
    /// Start time as shown to visitors (e.g., "09:30")
    pub start_time: String,
    /// End time as shown to visitors
    pub end_time: String,
    /// Maximum number of attendees
    pub max_capacity: u32,
    /// Attendees booked so far
    pub current_bookings: u32,
}

impl OpenDayEvent {
    /// Remaining places on this event. Saturates at zero if overbooked.
    pub fn spots_left(&self) -> u32 {
        self.max_capacity.saturating_sub(self.current_bookings)
    }

    /// Long en-GB date for event listings, e.g. "Saturday 14 June 2025".
    pub fn long_date(&self) -> String {
        self.event_date.format("%A %-d %B %Y").to_string()
    }

    /// Conversational date for selection and confirmation messages,
    /// e.g. "Saturday, June 14".
    pub fn spoken_date(&self) -> String {
        self.event_date.format("%A, %B %-d").to_string()
    }

    /// Short date used as a button label, e.g. "14 Jun 2025".
    pub fn short_date(&self) -> String {
        self.event_date.format("%-d %b %Y").to_string()
    }
}

/// Filters events to those happening today or later.
///
/// `today` is passed in rather than read from the clock so callers (and
/// tests) control the reference date.
pub fn upcoming_events(events: Vec<OpenDayEvent>, today: NaiveDate) -> Vec<OpenDayEvent> {
    events
        .into_iter()
        .filter(|event| event.event_date >= today)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, date: &str) -> OpenDayEvent {
        OpenDayEvent {
            id,
            title: format!("Open Day {id}"),
            event_date: date.parse().unwrap(),
            start_time: "09:30".to_string(),
            end_time: "12:00".to_string(),
            max_capacity: 40,
            current_bookings: 12,
        }
    }

    #[test]
    fn test_upcoming_keeps_today_and_future() {
        let today: NaiveDate = "2025-06-01".parse().unwrap();
        let events = vec![
            event(1, "2025-05-31"),
            event(2, "2025-06-01"),
            event(3, "2025-07-15"),
        ];

        let upcoming = upcoming_events(events, today);
        let ids: Vec<i64> = upcoming.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_spots_left_saturates() {
        let mut e = event(1, "2025-06-01");
        e.current_bookings = 45;
        assert_eq!(e.spots_left(), 0);

        e.current_bookings = 12;
        assert_eq!(e.spots_left(), 28);
    }

    #[test]
    fn test_date_rendering() {
        let e = event(1, "2025-06-14");
        assert_eq!(e.long_date(), "Saturday 14 June 2025");
        assert_eq!(e.short_date(), "14 Jun 2025");
        assert_eq!(e.spoken_date(), "Saturday, June 14");
    }
}
