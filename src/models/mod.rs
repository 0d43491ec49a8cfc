//! Database models and DTOs for all domain entities.

pub mod crew;
pub mod daily_log;
pub mod pagination;
pub mod zone;
