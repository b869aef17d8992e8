//! Application layer for the admissions assistant.
//!
//! Hosts one [`BookingService`] that owns per-visitor dialogue engines and
//! routes widget traffic to them.

pub mod booking_service;

pub use booking_service::BookingService;
