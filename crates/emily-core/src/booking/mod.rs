//! Booking dialogue domain module.
//!
//! This module contains the booking state machine and everything it needs
//! to drive one visitor's conversation.
//!
//! # Module Structure
//!
//! - `stage`: the closed set of state-machine positions (`BookingStage`)
//! - `session`: per-conversation mutable state (`BookingSession`)
//! - `turn`: dialogue turns and engine events the host renders
//! - `intent`: explicit booking-intent detection
//! - `engine`: the dialogue engine itself (`BookingDialogueEngine`)

mod engine;
mod intent;
mod session;
mod stage;
mod turn;


pub use engine::BookingDialogueEngine;
pub use intent::detect_booking_intent;
pub use session::{BookingDetails, BookingSession, BookingType};
pub use stage::BookingStage;
pub use turn::{Choice, DialogueTurn, EngineEvent, MessageOutcome};
