//! Placement algorithms

pub mod geodesy;
pub mod scale_curve;
pub mod placement;

pub use geodesy::CoordinateValidator;
pub use scale_curve::{ScaleCurve, ScaleRegime};
pub use placement::AnnotationPlacer;
