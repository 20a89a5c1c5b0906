use log::debug;
use nalgebra::Vector3;
use std::collections::VecDeque;

use crate::algorithms::geodesy::CoordinateValidator;
use crate::core::DeviceFix;
use crate::utils::config::TrackerConfig;
use crate::validation::AnnotationError;

/// Device location as seen by the placement loop
pub trait LocationSource {
    /// Most recently received fix
    fn current_location(&self) -> Option<DeviceFix>;

    /// Best fix known right now; may differ from the current one
    fn best_location_estimate(&self) -> Option<DeviceFix>;

    /// Viewer position in the scene, once tracking has resolved one
    fn scene_position(&self) -> Option<Vector3<f64>>;

    /// Fix used for placement: the best estimate, else the current fix
    fn placement_fix(&self) -> Option<DeviceFix> {
        self.best_location_estimate().or_else(|| self.current_location())
    }
}

/// Bounded history of device fixes with best-estimate selection.
///
/// The best estimate is the most accurate fix no older than
/// `max_fix_age_ms` relative to the newest fix. Ties go to the newer fix.
#[derive(Debug, Clone)]
pub struct FixTracker {
    fixes: VecDeque<DeviceFix>,
    scene_position: Option<Vector3<f64>>,
    config: TrackerConfig,
}

impl FixTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            fixes: VecDeque::with_capacity(config.history_capacity),
            scene_position: None,
            config,
        }
    }

    /// Record a new fix, evicting the oldest once the history is full
    pub fn push_fix(&mut self, fix: DeviceFix) -> Result<(), AnnotationError> {
        CoordinateValidator::validate(&fix.coordinate)?;
        CoordinateValidator::validate_accuracy(fix.horizontal_accuracy)?;
        CoordinateValidator::validate_accuracy(fix.vertical_accuracy)?;

        if let Some(latest) = self.fixes.back() {
            if fix.timestamp_ms < latest.timestamp_ms {
                return Err(AnnotationError::OutOfOrderFix {
                    timestamp_ms: fix.timestamp_ms,
                    latest_ms: latest.timestamp_ms,
                });
            }
        }

        while self.fixes.len() >= self.config.history_capacity.max(1) {
            self.fixes.pop_front();
        }
        self.fixes.push_back(fix);
        Ok(())
    }

    pub fn set_scene_position(&mut self, position: Vector3<f64>) {
        self.scene_position = Some(position);
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn clear(&mut self) {
        self.fixes.clear();
    }
}

impl Default for FixTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl LocationSource for FixTracker {
    fn current_location(&self) -> Option<DeviceFix> {
        self.fixes.back().copied()
    }

    fn best_location_estimate(&self) -> Option<DeviceFix> {
        let latest = self.fixes.back()?;
        let cutoff = latest.timestamp_ms.saturating_sub(self.config.max_fix_age_ms);

        let best = self
            .fixes
            .iter()
            .rev()
            .filter(|fix| fix.timestamp_ms >= cutoff)
            .fold(None::<&DeviceFix>, |best, fix| match best {
                Some(b) if b.horizontal_accuracy <= fix.horizontal_accuracy => Some(b),
                _ => Some(fix),
            });

        if let Some(best) = best {
            if best.timestamp_ms != latest.timestamp_ms {
                debug!(
                    "best estimate from {} ms ({:.1} m) preferred over latest ({:.1} m)",
                    best.timestamp_ms, best.horizontal_accuracy, latest.horizontal_accuracy
                );
            }
        }

        best.or(Some(latest)).copied()
    }

    fn scene_position(&self) -> Option<Vector3<f64>> {
        self.scene_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeoCoordinate;

    fn fix(accuracy: f64, timestamp_ms: u64) -> DeviceFix {
        DeviceFix::new(GeoCoordinate::new(48.8584, 2.2945, 35.0), accuracy, 3.0, timestamp_ms)
    }

    #[test]
    fn test_empty_tracker() {
        let tracker = FixTracker::default();

        assert!(tracker.is_empty());
        assert!(tracker.current_location().is_none());
        assert!(tracker.best_location_estimate().is_none());
        assert!(tracker.scene_position().is_none());
    }

    #[test]
    fn test_best_estimate_prefers_accuracy() {
        let mut tracker = FixTracker::default();
        tracker.push_fix(fix(20.0, 1_000)).unwrap();
        tracker.push_fix(fix(5.0, 2_000)).unwrap();
        tracker.push_fix(fix(12.0, 3_000)).unwrap();

        assert_eq!(tracker.current_location().unwrap().timestamp_ms, 3_000);
        assert_eq!(tracker.best_location_estimate().unwrap().timestamp_ms, 2_000);
    }

    #[test]
    fn test_best_estimate_tie_goes_to_newer_fix() {
        let mut tracker = FixTracker::default();
        tracker.push_fix(fix(5.0, 1_000)).unwrap();
        tracker.push_fix(fix(5.0, 2_000)).unwrap();

        assert_eq!(tracker.best_location_estimate().unwrap().timestamp_ms, 2_000);
    }

    #[test]
    fn test_placement_fix_prefers_best_estimate() {
        let mut tracker = FixTracker::default();
        assert!(tracker.placement_fix().is_none());

        tracker.push_fix(fix(4.0, 1_000)).unwrap();
        tracker.push_fix(fix(25.0, 2_000)).unwrap();

        assert_eq!(tracker.placement_fix().unwrap().timestamp_ms, 1_000);
    }

    #[test]
    fn test_stale_fixes_ignored() {
        let config = TrackerConfig {
            max_fix_age_ms: 5_000,
            history_capacity: 8,
        };
        let mut tracker = FixTracker::new(config);
        tracker.push_fix(fix(1.0, 0)).unwrap();
        tracker.push_fix(fix(30.0, 10_000)).unwrap();

        assert_eq!(tracker.best_location_estimate().unwrap().timestamp_ms, 10_000);
    }

    #[test]
    fn test_history_capacity() {
        let config = TrackerConfig {
            max_fix_age_ms: 60_000,
            history_capacity: 2,
        };
        let mut tracker = FixTracker::new(config);
        tracker.push_fix(fix(1.0, 0)).unwrap();
        tracker.push_fix(fix(10.0, 1)).unwrap();
        tracker.push_fix(fix(10.0, 2)).unwrap();

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.best_location_estimate().unwrap().timestamp_ms, 2);
    }

    #[test]
    fn test_rejects_invalid_fixes() {
        let mut tracker = FixTracker::default();
        tracker.push_fix(fix(5.0, 2_000)).unwrap();

        let out_of_order = tracker.push_fix(fix(5.0, 1_000));
        assert!(matches!(out_of_order, Err(AnnotationError::OutOfOrderFix { .. })));
        let negative = tracker.push_fix(fix(-1.0, 3_000));
        assert!(matches!(negative, Err(AnnotationError::InvalidAccuracy { .. })));

        let bad = DeviceFix::new(GeoCoordinate::new(95.0, 0.0, 0.0), 1.0, 1.0, 4_000);
        let invalid = tracker.push_fix(bad);
        assert!(matches!(invalid, Err(AnnotationError::InvalidCoordinate { .. })));
        assert_eq!(tracker.len(), 1);
    }
}
