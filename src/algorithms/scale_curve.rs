//! Distance-dependent scale curve
//!
//! Maps the raw device-to-anchor distance and the drift-adjusted distance to
//! a visual scale factor. The breakpoints and coefficients are tuned for
//! readability, not derived from a projection model.

use crate::core::{
    BASELINE_SCALE, DEFAULT_MAX_DISTANCE_M, NEAR_FIELD_DISTANCE_M, NEAR_FIELD_SCALE,
    SCALING_CONSTANT,
};
use crate::utils::config::{FarFieldPolicy, PlacementConfig};
use crate::validation::AnnotationError;

/// Which branch of the scale curve applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleRegime {
    /// `distance < adjusted_distance`: linear in the adjusted distance
    NearField,
    /// `distance >= adjusted_distance`: tapered by the raw distance
    FarField,
}

/// Piecewise scale curve parameterised by the far-field threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleCurve {
    max_distance: f64,
    far_field_policy: FarFieldPolicy,
}

impl ScaleCurve {
    /// Fails unless `max_distance` is finite and positive; the taper divides by it
    pub fn new(
        max_distance: f64,
        far_field_policy: FarFieldPolicy,
    ) -> Result<Self, AnnotationError> {
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(AnnotationError::InvalidPlacementConfig {
                parameter: "max_distance_m",
                value: max_distance,
                reason: "must be finite and positive",
            });
        }

        Ok(Self {
            max_distance,
            far_field_policy,
        })
    }

    pub fn from_config(config: &PlacementConfig) -> Result<Self, AnnotationError> {
        Self::new(config.max_distance_m, config.far_field_policy)
    }

    /// Branch selection; ties fall into the far field
    pub fn regime(distance: f64, adjusted_distance: f64) -> ScaleRegime {
        if distance < adjusted_distance {
            ScaleRegime::NearField
        } else {
            ScaleRegime::FarField
        }
    }

    /// Scale factor for an annotation `distance` meters away whose drift-adjusted
    /// distance is `adjusted_distance`.
    ///
    /// Below `adjusted_distance` the scale grows linearly; at or beyond it the
    /// scale is tapered by the raw distance. Both branches agree at
    /// `distance == adjusted_distance`.
    pub fn compute_scale(&self, distance: f64, adjusted_distance: f64) -> f64 {
        if self.far_field_policy == FarFieldPolicy::Cull && distance > self.max_distance {
            return 0.0;
        }

        let scale_for_scale = if distance < NEAR_FIELD_DISTANCE_M {
            NEAR_FIELD_SCALE
        } else {
            BASELINE_SCALE
        };

        match Self::regime(distance, adjusted_distance) {
            ScaleRegime::NearField => adjusted_distance * SCALING_CONSTANT * scale_for_scale,
            ScaleRegime::FarField => {
                let distance_ratio = adjusted_distance / self.max_distance;
                let max_scale = adjusted_distance
                    * SCALING_CONSTANT
                    * (adjusted_distance + self.max_distance)
                    / self.max_distance;

                (max_scale - distance * SCALING_CONSTANT * distance_ratio) * scale_for_scale
            }
        }
    }
}

impl Default for ScaleCurve {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE_M,
            far_field_policy: FarFieldPolicy::default(),
        }
    }
}
