//! Open-day event domain module.
//!
//! - `model`: the `OpenDayEvent` entity and date rendering helpers

mod model;

pub use model::{OpenDayEvent, upcoming_events};
