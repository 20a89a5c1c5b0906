//! Tuned placement constants and Earth model parameters

/// Linear distance-to-scale coefficient shared by both scaling modes
pub const SCALING_CONSTANT: f64 = 0.181;

/// Pivot drop relative to scale, keeps the sprite standing on its base
pub const PIVOT_DROP_FACTOR: f64 = 1.1;

/// Below this raw distance (meters) annotations are drawn smaller
pub const NEAR_FIELD_DISTANCE_M: f64 = 5.0;

/// Scale-for-scale factor inside the near field
pub const NEAR_FIELD_SCALE: f64 = 0.15;

/// Baseline scale-for-scale factor
pub const BASELINE_SCALE: f64 = 0.7;

/// Raw distance (meters) beyond which the absolute mode shrinks by `FAR_READABILITY_FACTOR`
pub const FAR_READABILITY_DISTANCE_M: f64 = 3000.0;

pub const FAR_READABILITY_FACTOR: f64 = 0.75;

/// Default threshold (meters) for the far-field taper
pub const DEFAULT_MAX_DISTANCE_M: f64 = 50.0;

/// Steady-state transition time (seconds)
pub const DEFAULT_ANIMATION_SECONDS: f64 = 0.1;

/// Transition time (seconds) when the scale curve collapses to zero
pub const COLLAPSE_ANIMATION_SECONDS: f64 = 1.5;

/// Mean Earth radius in meters, used for great-circle distance
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Earth semi-major axis in meters (WGS84)
pub const EARTH_RADIUS_WGS84: f64 = 6378137.0;

/// Earth flattening factor (WGS84)
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// Eccentricity squared (WGS84)
pub const ECCENTRICITY_SQUARED_WGS84: f64 =
    2.0 * EARTH_FLATTENING_WGS84 - EARTH_FLATTENING_WGS84 * EARTH_FLATTENING_WGS84;
