// Scheduling and tracking: application listing, the simulated inbox checker
// and the calendar events it would create.

pub mod calendar;
pub mod checker;
pub mod fixtures;
pub mod handlers;
