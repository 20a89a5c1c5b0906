use thiserror::Error;

/// Errors raised while constructing annotation nodes or feeding the fix tracker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnotationError {
    #[error("invalid coordinate ({latitude}, {longitude}, {altitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        altitude: f64,
        reason: &'static str,
    },

    #[error("invalid accuracy {value}: must be finite and non-negative")]
    InvalidAccuracy { value: f64 },

    #[error("annotation bitmap is empty ({width}x{height}, {bytes} bytes)")]
    EmptyBitmap { width: u32, height: u32, bytes: usize },

    #[error("bitmap buffer holds {actual} bytes, expected {expected} for RGBA")]
    BitmapSizeMismatch { expected: usize, actual: usize },

    #[error("fix timestamp {timestamp_ms} precedes latest fix {latest_ms}")]
    OutOfOrderFix { timestamp_ms: u64, latest_ms: u64 },

    #[error("invalid placement setting {parameter} = {value}: {reason}")]
    InvalidPlacementConfig {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: String,
    },

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration rejected with {} error(s): {}", .0.len(), .0.join("; "))]
    Rejected(Vec<String>),
}

impl ConfigError {
    pub fn invalid(
        parameter: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidParameter {
            parameter,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = AnnotationError::InvalidAccuracy { value: -1.0 };
        assert_eq!(error.to_string(), "invalid accuracy -1: must be finite and non-negative");

        let error = AnnotationError::InvalidPlacementConfig {
            parameter: "max_distance_m",
            value: 0.0,
            reason: "must be finite and positive",
        };
        assert_eq!(
            error.to_string(),
            "invalid placement setting max_distance_m = 0: must be finite and positive"
        );

        let error = ConfigError::invalid("max_distance_m", 0.0, "must be positive");
        assert_eq!(error.to_string(), "invalid parameter max_distance_m = 0: must be positive");

        let error = ConfigError::Rejected(vec!["a".into(), "b".into()]);
        assert_eq!(error.to_string(), "configuration rejected with 2 error(s): a; b");
    }
}
