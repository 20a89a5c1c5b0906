//! Geo-anchored AR annotations
//!
//! Places billboard annotations at GPS coordinates in an AR scene and keeps
//! their size readable from a few meters out to several kilometers as the
//! viewing device moves.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{
    AnnotationTarget, Bitmap, DeviceFix, GeoCoordinate, LocationTranslation, NodeTransform,
    PlacementResult,
};
pub use algorithms::{AnnotationPlacer, CoordinateValidator, ScaleCurve, ScaleRegime};
pub use processing::{DistanceAdjuster, FixTracker, LocationSource, RangeClampingAdjuster};
pub use validation::{AnnotationError, ConfigError};
pub use utils::config::{
    AdjusterConfig, AnnotationConfig, ConfigurationManager, FarFieldPolicy, PlacementConfig,
    TrackerConfig, ValidationResult,
};
pub use api::{AnnotationNode, RecordingSurface, RenderSurface};
