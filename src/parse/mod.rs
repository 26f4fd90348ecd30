//! Parsing stages: advisory titles, regional warnings, and whole records.

pub mod record;
pub mod regional;
pub mod title;
