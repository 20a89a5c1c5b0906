//! Drift compensation for GPS-anchored nodes
//!
//! A raw GPS distance can jump by tens of meters between fixes. The adjuster
//! turns it into a distance and scene position that are stable enough to
//! render, pulling far targets into a fixed range around the viewer.

use log::trace;
use nalgebra::Vector3;

use crate::core::GeoCoordinate;
use crate::processing::tracker::LocationSource;
use crate::utils::config::AdjusterConfig;

/// Maps a raw device-to-target distance to a drift-compensated one.
///
/// Implementations must be pure and deterministic for given inputs and must
/// return a non-negative distance.
pub trait DistanceAdjuster {
    fn adjusted_distance(
        &self,
        distance: f64,
        setup: bool,
        scene_position: &Vector3<f64>,
        target: &GeoCoordinate,
    ) -> f64;

    /// Scene position the node should move to, `None` to leave it where it is
    fn node_position(
        &self,
        _distance: f64,
        _setup: bool,
        _scene_position: &Vector3<f64>,
        _target: &GeoCoordinate,
    ) -> Option<Vector3<f64>> {
        None
    }
}

impl<F> DistanceAdjuster for F
where
    F: Fn(f64, bool, &Vector3<f64>, &GeoCoordinate) -> f64,
{
    fn adjusted_distance(
        &self,
        distance: f64,
        setup: bool,
        scene_position: &Vector3<f64>,
        target: &GeoCoordinate,
    ) -> f64 {
        self(distance, setup, scene_position, target)
    }
}

/// Adjuster that keeps targets inside `clamp_range_m` of the viewer.
///
/// Targets beyond the range are moved along the device-to-target bearing to
/// the range boundary. Until the device location is confirmed the node keeps
/// its scene position and the adjusted distance is zero.
#[derive(Debug, Clone)]
pub struct RangeClampingAdjuster {
    device: Option<GeoCoordinate>,
    location_confirmed: bool,
    config: AdjusterConfig,
}

impl RangeClampingAdjuster {
    pub fn new(config: AdjusterConfig) -> Self {
        Self {
            device: None,
            location_confirmed: false,
            config,
        }
    }

    /// Device location the translations are measured from
    pub fn set_device_location(&mut self, device: GeoCoordinate) {
        self.device = Some(device);
    }

    /// Measure from the same fix the placer will use this frame
    pub fn track<S: LocationSource + ?Sized>(&mut self, source: &S) {
        if let Some(fix) = source.placement_fix() {
            self.device = Some(fix.coordinate);
        }
    }

    pub fn set_location_confirmed(&mut self, confirmed: bool) {
        self.location_confirmed = confirmed;
    }

    pub fn is_location_confirmed(&self) -> bool {
        self.location_confirmed
    }

    fn adjust(
        &self,
        distance: f64,
        setup: bool,
        scene_position: &Vector3<f64>,
        target: &GeoCoordinate,
    ) -> (f64, Option<Vector3<f64>>) {
        let device = match self.device {
            Some(device) if self.location_confirmed => device,
            _ => return (0.0, None),
        };

        let range = self.config.clamp_range_m;
        let reposition = distance > range || self.config.continually_adjust_within_range || setup;
        if !reposition {
            return (distance, None);
        }

        let mut translation = device.translation_to(target);
        if self.config.ignore_altitude {
            translation.up = 0.0;
        }

        if distance > range {
            let factor = range / distance;
            trace!("clamping target at {:.1} m to {:.1} m", distance, range);
            let offset = translation.scaled(factor).to_scene();
            (distance * factor, Some(scene_position + offset))
        } else {
            (distance, Some(scene_position + translation.to_scene()))
        }
    }
}

impl Default for RangeClampingAdjuster {
    fn default() -> Self {
        Self::new(AdjusterConfig::default())
    }
}

impl DistanceAdjuster for RangeClampingAdjuster {
    fn adjusted_distance(
        &self,
        distance: f64,
        setup: bool,
        scene_position: &Vector3<f64>,
        target: &GeoCoordinate,
    ) -> f64 {
        self.adjust(distance, setup, scene_position, target).0
    }

    fn node_position(
        &self,
        distance: f64,
        setup: bool,
        scene_position: &Vector3<f64>,
        target: &GeoCoordinate,
    ) -> Option<Vector3<f64>> {
        self.adjust(distance, setup, scene_position, target).1
    }
}
