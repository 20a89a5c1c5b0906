//! Core data types for annotation placement

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::PIVOT_DROP_FACTOR;

/// Geodetic coordinate (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above the ellipsoid in meters
    pub altitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }

    /// Same horizontal position at a different altitude
    pub fn with_altitude(&self, altitude: f64) -> Self {
        Self { altitude, ..*self }
    }
}

/// GPS fix of the viewing device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceFix {
    pub coordinate: GeoCoordinate,
    /// Horizontal accuracy radius in meters (smaller is better)
    pub horizontal_accuracy: f64,
    /// Vertical accuracy in meters (smaller is better)
    pub vertical_accuracy: f64,
    /// Fix time in milliseconds
    pub timestamp_ms: u64,
}

impl DeviceFix {
    pub fn new(
        coordinate: GeoCoordinate,
        horizontal_accuracy: f64,
        vertical_accuracy: f64,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            coordinate,
            horizontal_accuracy,
            vertical_accuracy,
            timestamp_ms,
        }
    }
}

/// The coordinate an annotation is anchored to and where it currently sits in the scene.
///
/// The anchor coordinate is fixed at creation; only the scene position moves.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTarget {
    coordinate: GeoCoordinate,
    /// Current position in the AR scene graph. Placement keeps the node here
    /// on frames where the adjuster does not move it.
    pub scene_position: Option<Vector3<f64>>,
}

impl AnnotationTarget {
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate,
            scene_position: None,
        }
    }

    pub fn coordinate(&self) -> &GeoCoordinate {
        &self.coordinate
    }
}

/// Transform computed for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub position: Vector3<f64>,
    pub scale: Vector3<f64>,
    pub pivot: Vector3<f64>,
    pub animation_duration_seconds: f64,
}

impl PlacementResult {
    /// Build a result with uniform `scale` and the matching base-anchored pivot
    pub fn uniform(position: Vector3<f64>, scale: f64, animation_duration_seconds: f64) -> Self {
        Self {
            position,
            scale: Vector3::repeat(scale),
            pivot: Vector3::new(0.0, -PIVOT_DROP_FACTOR * scale, 0.0),
            animation_duration_seconds,
        }
    }

    /// The uniform scale factor
    pub fn scale_factor(&self) -> f64 {
        self.scale.x
    }
}

/// Transform currently applied to an annotation node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Vector3<f64>,
    pub scale: Vector3<f64>,
    pub pivot: Vector3<f64>,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
            pivot: Vector3::zeros(),
        }
    }
}

impl From<&PlacementResult> for NodeTransform {
    fn from(result: &PlacementResult) -> Self {
        Self {
            position: result.position,
            scale: result.scale,
            pivot: result.pivot,
        }
    }
}

/// Offset between two coordinates in the origin's local tangent plane (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationTranslation {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl LocationTranslation {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            east: self.east * factor,
            north: self.north * factor,
            up: self.up * factor,
        }
    }

    /// Scene-space offset: x east, y up, z south
    pub fn to_scene(&self) -> Vector3<f64> {
        Vector3::new(self.east, self.up, -self.north)
    }
}

/// Pre-rendered RGBA image shown on the billboard quad
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self { width, height, pixels }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
