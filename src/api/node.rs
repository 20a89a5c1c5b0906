//! Geo-anchored annotation node
//!
//! Owns the anchor, the billboard image and the transform currently applied
//! to the scene. Each frame update either replaces the whole transform or
//! leaves it untouched.

use log::debug;
use nalgebra::Vector3;

use crate::algorithms::geodesy::CoordinateValidator;
use crate::algorithms::placement::AnnotationPlacer;
use crate::api::surface::RenderSurface;
use crate::core::{AnnotationTarget, Bitmap, GeoCoordinate, NodeTransform, PlacementResult};
use crate::processing::drift::DistanceAdjuster;
use crate::processing::tracker::LocationSource;
use crate::utils::config::PlacementConfig;
use crate::validation::AnnotationError;

/// Billboard annotation pinned to a GPS coordinate
#[derive(Debug, Clone)]
pub struct AnnotationNode {
    target: AnnotationTarget,
    bitmap: Bitmap,
    placer: AnnotationPlacer,
    transform: NodeTransform,
    has_been_placed: bool,
}

impl AnnotationNode {
    /// Create a node showing `bitmap` at `coordinate`.
    ///
    /// The bitmap must be a non-empty tightly packed RGBA buffer and the
    /// config's `max_distance_m` must be positive.
    pub fn new(
        coordinate: GeoCoordinate,
        bitmap: Bitmap,
        config: &PlacementConfig,
    ) -> Result<Self, AnnotationError> {
        CoordinateValidator::validate(&coordinate)?;
        let placer = AnnotationPlacer::new(config)?;

        if bitmap.is_empty() {
            return Err(AnnotationError::EmptyBitmap {
                width: bitmap.width,
                height: bitmap.height,
                bytes: bitmap.pixels.len(),
            });
        }

        let expected = bitmap.width as usize * bitmap.height as usize * 4;
        if bitmap.pixels.len() != expected {
            return Err(AnnotationError::BitmapSizeMismatch {
                expected,
                actual: bitmap.pixels.len(),
            });
        }

        Ok(Self {
            target: AnnotationTarget::new(coordinate),
            bitmap,
            placer,
            transform: NodeTransform::default(),
            has_been_placed: false,
        })
    }

    pub fn coordinate(&self) -> &GeoCoordinate {
        self.target.coordinate()
    }

    pub fn target(&self) -> &AnnotationTarget {
        &self.target
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn transform(&self) -> &NodeTransform {
        &self.transform
    }

    pub fn has_been_placed(&self) -> bool {
        self.has_been_placed
    }

    pub fn set_scale_relative_to_distance(&mut self, enabled: bool) {
        self.placer.set_scale_relative_to_distance(enabled);
    }

    /// Move the node in the scene; it stays there until an adjuster moves it
    pub fn set_scene_position(&mut self, position: Vector3<f64>) {
        self.target.scene_position = Some(position);
    }

    /// Force the next update to be treated as the initial placement
    pub fn reset_placement(&mut self) {
        self.has_been_placed = false;
    }

    /// Run one frame of placement.
    ///
    /// Returns the applied result, or `None` when the location source had no
    /// scene position or fix this frame.
    pub fn update<S, A, R>(
        &mut self,
        source: &S,
        adjuster: &A,
        surface: &mut R,
    ) -> Option<PlacementResult>
    where
        S: LocationSource + ?Sized,
        A: DistanceAdjuster + ?Sized,
        R: RenderSurface + ?Sized,
    {
        let fix = source.placement_fix();
        let setup = !self.has_been_placed;

        let result = self.placer.place(
            source.scene_position(),
            fix.as_ref(),
            &self.target,
            setup,
            adjuster,
        )?;

        self.transform = NodeTransform::from(&result);
        self.target.scene_position = Some(result.position);
        if setup {
            debug!(
                "annotation at ({:.6}, {:.6}) placed",
                self.target.coordinate().latitude,
                self.target.coordinate().longitude
            );
            self.has_been_placed = true;
        }

        surface.apply(&result);
        Some(result)
    }
}
