//! Per-frame placement of geo-anchored billboards
//!
//! Converts the device's best GPS estimate, the anchor coordinate and a
//! drift-compensated distance into a node transform. The visual size is kept
//! readable from a few meters out to several kilometers.

use log::{debug, trace};
use nalgebra::Vector3;

use crate::algorithms::scale_curve::ScaleCurve;
use crate::core::{
    AnnotationTarget, DeviceFix, GeoCoordinate, PlacementResult, COLLAPSE_ANIMATION_SECONDS,
    DEFAULT_ANIMATION_SECONDS, FAR_READABILITY_DISTANCE_M, FAR_READABILITY_FACTOR,
    SCALING_CONSTANT,
};
use crate::processing::drift::DistanceAdjuster;
use crate::utils::config::PlacementConfig;
use crate::validation::AnnotationError;

/// Computes annotation transforms from device and anchor locations
#[derive(Debug, Clone)]
pub struct AnnotationPlacer {
    curve: ScaleCurve,
    scale_relative_to_distance: bool,
}

impl AnnotationPlacer {
    pub fn new(config: &PlacementConfig) -> Result<Self, AnnotationError> {
        Ok(Self {
            curve: ScaleCurve::from_config(config)?,
            scale_relative_to_distance: config.scale_relative_to_distance,
        })
    }

    pub fn scale_relative_to_distance(&self) -> bool {
        self.scale_relative_to_distance
    }

    pub fn set_scale_relative_to_distance(&mut self, enabled: bool) {
        self.scale_relative_to_distance = enabled;
    }

    /// Scale curve value for the given raw and adjusted distances
    pub fn compute_scale(&self, distance: f64, adjusted_distance: f64) -> f64 {
        self.curve.compute_scale(distance, adjusted_distance)
    }

    /// Anchor used for the initial snap; far targets are lifted above the horizon
    pub fn setup_target(target: &GeoCoordinate, distance: f64) -> GeoCoordinate {
        if distance > 1.0 {
            target.with_altitude(distance * 3.0 * target.altitude + distance * 2.0)
        } else {
            *target
        }
    }

    /// Compute this frame's transform.
    ///
    /// Returns `None` when the scene position or device fix is not available
    /// yet; the caller keeps the previous transform in that case.
    ///
    /// The node moves to the adjuster's position when it reports one. Otherwise
    /// it stays at the target's current scene position, or starts at
    /// `device_position` if it has never been placed.
    pub fn place<A>(
        &self,
        device_position: Option<Vector3<f64>>,
        device_fix: Option<&DeviceFix>,
        target: &AnnotationTarget,
        is_initial_setup: bool,
        adjuster: &A,
    ) -> Option<PlacementResult>
    where
        A: DistanceAdjuster + ?Sized,
    {
        let (position, fix) = match (device_position, device_fix) {
            (Some(position), Some(fix)) => (position, fix),
            (position, fix) => {
                debug!(
                    "skipping placement: scene position {}, device fix {}",
                    if position.is_some() { "available" } else { "missing" },
                    if fix.is_some() { "available" } else { "missing" },
                );
                return None;
            }
        };

        let anchor = target.coordinate();
        let distance = fix.coordinate.distance_to(anchor);

        let adjusted_target = if is_initial_setup {
            Self::setup_target(anchor, distance)
        } else {
            *anchor
        };

        let adjusted_distance =
            adjuster.adjusted_distance(distance, is_initial_setup, &position, &adjusted_target);
        // Negative or non-finite adjusted distances collapse to zero
        let adjusted_distance = if adjusted_distance.is_finite() {
            adjusted_distance.max(0.0)
        } else {
            0.0
        };
        let node_position = adjuster
            .node_position(distance, is_initial_setup, &position, &adjusted_target)
            .or(target.scene_position)
            .unwrap_or(position);

        let node_scale = self.curve.compute_scale(distance, adjusted_distance);

        let scale = if self.scale_relative_to_distance {
            node_scale
        } else {
            let readable = adjusted_distance * SCALING_CONSTANT;
            if distance > FAR_READABILITY_DISTANCE_M {
                readable * FAR_READABILITY_FACTOR
            } else {
                readable
            }
        };

        let animation = if is_initial_setup {
            0.0
        } else if node_scale == 0.0 {
            COLLAPSE_ANIMATION_SECONDS
        } else {
            DEFAULT_ANIMATION_SECONDS
        };

        if is_initial_setup {
            debug!(
                "initial placement: distance {:.1} m, adjusted {:.1} m, scale {:.3}",
                distance, adjusted_distance, scale
            );
        } else {
            trace!(
                "placement: distance {:.1} m, adjusted {:.1} m, node scale {:.3}, scale {:.3}",
                distance,
                adjusted_distance,
                node_scale,
                scale
            );
        }

        Some(PlacementResult::uniform(node_position, scale, animation))
    }
}

impl Default for AnnotationPlacer {
    fn default() -> Self {
        Self {
            curve: ScaleCurve::default(),
            scale_relative_to_distance: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::FarFieldPolicy;
    use approx::assert_relative_eq;

    fn fixed(value: f64) -> impl Fn(f64, bool, &Vector3<f64>, &GeoCoordinate) -> f64 {
        move |_, _, _, _| value
    }

    fn passthrough(distance: f64, _: bool, _: &Vector3<f64>, _: &GeoCoordinate) -> f64 {
        distance
    }

    fn device_fix() -> DeviceFix {
        DeviceFix::new(GeoCoordinate::new(0.0, 0.0, 0.0), 5.0, 3.0, 0)
    }

    /// Target `meters` north of the device fix
    fn target_north(meters: f64) -> AnnotationTarget {
        let degrees = (meters / crate::core::EARTH_MEAN_RADIUS_M).to_degrees();
        AnnotationTarget::new(GeoCoordinate::new(degrees, 0.0, 0.0))
    }

    fn placer(relative: bool) -> AnnotationPlacer {
        let config = PlacementConfig {
            scale_relative_to_distance: relative,
            ..PlacementConfig::default()
        };
        AnnotationPlacer::new(&config).unwrap()
    }

    /// Moves every node to a fixed scene position
    struct Relocate(Vector3<f64>);

    impl DistanceAdjuster for Relocate {
        fn adjusted_distance(&self, d: f64, _: bool, _: &Vector3<f64>, _: &GeoCoordinate) -> f64 {
            d
        }

        fn node_position(
            &self,
            _: f64,
            _: bool,
            _: &Vector3<f64>,
            _: &GeoCoordinate,
        ) -> Option<Vector3<f64>> {
            Some(self.0)
        }
    }

    #[test]
    fn test_invalid_max_distance_rejected() {
        for max_distance in [0.0, -1.0, f64::NAN] {
            let config = PlacementConfig {
                max_distance_m: max_distance,
                ..PlacementConfig::default()
            };
            let result = AnnotationPlacer::new(&config);
            assert!(matches!(result, Err(AnnotationError::InvalidPlacementConfig { .. })));
        }

        let cull = PlacementConfig {
            far_field_policy: FarFieldPolicy::Cull,
            ..PlacementConfig::default()
        };
        assert!(AnnotationPlacer::new(&cull).is_ok());
    }

    #[test]
    fn test_missing_inputs_skip() {
        let placer = AnnotationPlacer::default();
        let target = target_north(10.0);
        let fix = device_fix();
        let origin = Some(Vector3::zeros());

        assert!(placer.place(None, Some(&fix), &target, false, &passthrough).is_none());
        assert!(placer.place(origin, None, &target, false, &passthrough).is_none());
        assert!(placer.place(origin, Some(&fix), &target, false, &passthrough).is_some());
    }

    #[test]
    fn test_setup_target_altitude() {
        let target = GeoCoordinate::new(1.0, 2.0, 10.0);

        let lifted = AnnotationPlacer::setup_target(&target, 100.0);
        assert_eq!(lifted.altitude, 100.0 * 3.0 * 10.0 + 100.0 * 2.0);
        assert_eq!(lifted.latitude, 1.0);

        assert_eq!(AnnotationPlacer::setup_target(&target, 1.0), target);
        assert_eq!(AnnotationPlacer::setup_target(&target, 0.5), target);
    }

    #[test]
    fn test_adjuster_sees_lifted_target_only_on_setup() {
        let placer = AnnotationPlacer::default();
        let target = target_north(100.0);
        let fix = device_fix();
        let origin = Some(Vector3::zeros());
        let seen = std::cell::Cell::new(f64::NAN);
        let record = |distance: f64, _: bool, _: &Vector3<f64>, target: &GeoCoordinate| {
            seen.set(target.altitude);
            distance
        };

        placer.place(origin, Some(&fix), &target, true, &record).unwrap();
        assert!(seen.get() > 199.0);

        placer.place(origin, Some(&fix), &target, false, &record).unwrap();
        assert_eq!(seen.get(), 0.0);
    }

    #[test]
    fn test_pivot_tracks_scale_in_both_modes() {
        let fix = device_fix();
        let origin = Some(Vector3::zeros());
        for relative in [false, true] {
            let placer = placer(relative);

            for (meters, adjusted) in [(2.0, 4.0), (30.0, 30.0), (80.0, 60.0), (5000.0, 100.0)] {
                let target = target_north(meters);
                let result = placer
                    .place(origin, Some(&fix), &target, false, &fixed(adjusted))
                    .unwrap();

                assert_eq!(result.scale.x, result.scale.y);
                assert_eq!(result.scale.y, result.scale.z);
                assert_relative_eq!(result.pivot.y, -1.1 * result.scale.x, epsilon = 1e-12);
                assert_eq!(result.pivot.x, 0.0);
                assert_eq!(result.pivot.z, 0.0);
            }
        }
    }

    #[test]
    fn test_relative_mode_uses_scale_curve() {
        let placer = placer(true);
        let fix = device_fix();

        for meters in [3.0, 40.0, 4000.0] {
            let target = target_north(meters);
            let distance = fix.coordinate.distance_to(target.coordinate());
            let result = placer
                .place(Some(Vector3::zeros()), Some(&fix), &target, false, &fixed(20.0))
                .unwrap();

            assert_eq!(result.scale_factor(), placer.compute_scale(distance, 20.0));
        }
    }

    #[test]
    fn test_absolute_mode_far_readability_factor() {
        let placer = AnnotationPlacer::default();
        let fix = device_fix();
        let origin = Some(Vector3::zeros());

        let near_target = target_north(2000.0);
        let far_target = target_north(10_000.0);
        let near = placer
            .place(origin, Some(&fix), &near_target, false, &fixed(100.0))
            .unwrap();
        let far = placer
            .place(origin, Some(&fix), &far_target, false, &fixed(100.0))
            .unwrap();

        assert_relative_eq!(near.scale_factor(), 100.0 * 0.181, epsilon = 1e-12);
        assert_relative_eq!(far.scale_factor(), 100.0 * 0.181 * 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_animation_durations() {
        let placer = AnnotationPlacer::default();
        let fix = device_fix();
        let origin = Some(Vector3::zeros());
        let target = target_north(30.0);

        let setup = placer.place(origin, Some(&fix), &target, true, &fixed(0.0)).unwrap();
        assert_eq!(setup.animation_duration_seconds, 0.0);

        let collapsed = placer.place(origin, Some(&fix), &target, false, &fixed(0.0)).unwrap();
        assert_eq!(collapsed.animation_duration_seconds, 1.5);

        let steady = placer.place(origin, Some(&fix), &target, false, &fixed(30.0)).unwrap();
        assert_eq!(steady.animation_duration_seconds, 0.1);
    }

    #[test]
    fn test_negative_adjusted_distance_clamped() {
        let placer = AnnotationPlacer::default();
        let fix = device_fix();

        let result = placer
            .place(Some(Vector3::zeros()), Some(&fix), &target_north(30.0), false, &fixed(-5.0))
            .unwrap();

        assert_eq!(result.scale_factor(), 0.0);
        assert_eq!(result.animation_duration_seconds, 1.5);
    }

    #[test]
    fn test_unplaced_node_starts_at_device_position() {
        let placer = AnnotationPlacer::default();
        let fix = device_fix();
        let origin = Vector3::new(1.0, 2.0, 3.0);

        let result = placer
            .place(Some(origin), Some(&fix), &target_north(30.0), false, &passthrough)
            .unwrap();

        assert_eq!(result.position, origin);
    }

    #[test]
    fn test_node_keeps_scene_position_when_adjuster_does_not_move_it() {
        let placer = AnnotationPlacer::default();
        let fix = device_fix();
        let mut target = target_north(30.0);
        let placed = Vector3::new(0.0, 0.0, -30.0);
        target.scene_position = Some(placed);

        let result = placer
            .place(Some(Vector3::new(5.0, 0.0, 0.0)), Some(&fix), &target, false, &passthrough)
            .unwrap();

        assert_eq!(result.position, placed);
    }

    #[test]
    fn test_adjuster_position_overrides_scene_position() {
        let placer = AnnotationPlacer::default();
        let fix = device_fix();
        let mut target = target_north(30.0);
        target.scene_position = Some(Vector3::new(0.0, 0.0, -30.0));
        let moved = Vector3::new(7.0, 1.0, -20.0);

        let result = placer
            .place(Some(Vector3::zeros()), Some(&fix), &target, false, &Relocate(moved))
            .unwrap();

        assert_eq!(result.position, moved);
    }
}
