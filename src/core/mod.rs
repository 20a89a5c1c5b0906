//! Core types and constants for geo-anchored annotation placement

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
