//! Utility modules

pub mod pacing;
pub mod time;
