pub mod backend;
pub mod booking;
pub mod config;
pub mod enquiry;
pub mod error;
pub mod event;

// Re-export common error type
pub use error::{EmilyError, Result};
