//! Location processing collaborators

pub mod drift;
pub mod tracker;

pub use drift::{DistanceAdjuster, RangeClampingAdjuster};
pub use tracker::{FixTracker, LocationSource};
