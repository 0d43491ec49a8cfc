//! Business logic services.

pub mod calendar;
pub mod daily_log;
pub mod dashboard;
pub mod zone;
