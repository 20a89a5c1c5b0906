use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::DEFAULT_MAX_DISTANCE_M;
use crate::validation::ConfigError;

/// What happens to the scale curve beyond `max_distance_m`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarFieldPolicy {
    /// Keep tapering the scale with raw distance
    #[default]
    Taper,
    /// Collapse the scale to zero, hiding the annotation
    Cull,
}

/// Scale curve and scaling mode parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Far-field threshold of the scale curve (meters)
    pub max_distance_m: f64,
    /// Scale physically with distance instead of keeping a readable size
    pub scale_relative_to_distance: bool,
    pub far_field_policy: FarFieldPolicy,
}

/// Drift compensation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjusterConfig {
    /// Targets further than this are pulled in to this range (meters)
    pub clamp_range_m: f64,
    /// Drop the altitude component of the device-to-target translation
    pub ignore_altitude: bool,
    /// Reposition targets inside the clamp range on every frame, not only at setup
    pub continually_adjust_within_range: bool,
}

/// Fix history parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Fixes older than this are not considered for the best estimate (milliseconds)
    pub max_fix_age_ms: u64,
    /// Number of fixes retained
    pub history_capacity: usize,
}

/// Complete configuration for annotation placement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub placement: PlacementConfig,
    pub adjuster: AdjusterConfig,
    pub tracker: TrackerConfig,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            scale_relative_to_distance: false,
            far_field_policy: FarFieldPolicy::Taper,
        }
    }
}

impl Default for AdjusterConfig {
    fn default() -> Self {
        Self {
            clamp_range_m: 100.0,
            ignore_altitude: false,
            continually_adjust_within_range: true,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_fix_age_ms: 15_000,
            history_capacity: 16,
        }
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Main configuration manager
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: AnnotationConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create manager with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create manager from a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: AnnotationConfig) -> Result<(), ConfigError> {
        let validation = Self::validate(&config);
        if !validation.is_valid() {
            return Err(ConfigError::Rejected(validation.errors));
        }
        for warning in &validation.warnings {
            warn!("configuration warning: {}", warning);
        }

        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: AnnotationConfig = serde_json::from_str(&contents)?;

        self.update_config(config)?;
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.config)?;
        fs::write(path, json)?;

        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save to the file the configuration was last loaded from or saved to
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::invalid(
                "config_file_path",
                "none",
                "no configuration file associated",
            )),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn set_max_distance(&mut self, max_distance_m: f64) -> Result<f64, ConfigError> {
        if !max_distance_m.is_finite() || max_distance_m <= 0.0 {
            return Err(ConfigError::invalid(
                "max_distance_m",
                max_distance_m,
                "must be a positive number of meters",
            ));
        }

        let old = self.config.placement.max_distance_m;
        self.config.placement.max_distance_m = max_distance_m;
        self.is_modified = true;
        Ok(old)
    }

    pub fn set_scale_relative_to_distance(&mut self, enabled: bool) -> bool {
        let old = self.config.placement.scale_relative_to_distance;
        self.config.placement.scale_relative_to_distance = enabled;
        self.is_modified = true;
        old
    }

    pub fn set_clamp_range(&mut self, clamp_range_m: f64) -> Result<f64, ConfigError> {
        if !clamp_range_m.is_finite() || clamp_range_m <= 0.0 {
            return Err(ConfigError::invalid(
                "clamp_range_m",
                clamp_range_m,
                "must be a positive number of meters",
            ));
        }

        let old = self.config.adjuster.clamp_range_m;
        self.config.adjuster.clamp_range_m = clamp_range_m;
        self.is_modified = true;
        Ok(old)
    }

    /// Validate a configuration, collecting every problem found
    pub fn validate(config: &AnnotationConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        let max_distance = config.placement.max_distance_m;
        if !max_distance.is_finite() || max_distance <= 0.0 {
            result.errors.push(format!("max_distance_m must be positive, got {}", max_distance));
        } else if max_distance > 10_000.0 {
            result
                .warnings
                .push(format!("max_distance_m of {} m flattens the far-field taper", max_distance));
        }

        let clamp_range = config.adjuster.clamp_range_m;
        if !clamp_range.is_finite() || clamp_range <= 0.0 {
            result.errors.push(format!("clamp_range_m must be positive, got {}", clamp_range));
        }

        if config.tracker.history_capacity == 0 {
            result.errors.push("history_capacity must be at least 1".to_string());
        }
        if config.tracker.max_fix_age_ms == 0 {
            result
                .warnings
                .push("max_fix_age_ms of 0 treats every fix but the newest as stale".to_string());
        }

        if config.placement.far_field_policy == FarFieldPolicy::Cull {
            result
                .warnings
                .push("far-field culling hides annotations beyond max_distance_m".to_string());
        }

        result
    }
}
