//! Report output (text and JSON)

pub mod json;
pub mod text;
