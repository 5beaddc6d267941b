//! Error types for configuration and registry operations.

use thiserror::Error;

use crate::components::DetectorId;

/// Invalid or unreadable detection configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("thresholds must satisfy 0 <= caution < alert < discovered <= 1 (got {caution}, {alert}, {discovered})")]
    ThresholdOrder {
        caution: f64,
        alert: f64,
        discovered: f64,
    },
    #[error("{name} must be positive and finite (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be non-negative and finite (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// A detector that violates its geometric preconditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    #[error("range must be positive and finite (got {0})")]
    InvalidRange(f64),
    #[error("field of view must be in (0, 360] degrees (got {0})")]
    InvalidFieldOfView(f64),
    #[error("position must be finite")]
    NonFinitePosition,
    #[error("facing must be finite (got {0})")]
    NonFiniteFacing(f64),
    #[error("event threshold must be in [0, 1) (got {0})")]
    InvalidEventThreshold(f64),
}

/// Registry operation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("detector {id:?} rejected: {source}")]
    InvalidDetector {
        id: DetectorId,
        #[source]
        source: DetectorError,
    },
    #[error("detector {0:?} is already registered")]
    DuplicateDetector(DetectorId),
    #[error("detector {0:?} is not registered")]
    UnknownDetector(DetectorId),
    #[error("audio zone rejected: radius {radius}, sensitivity {sensitivity}")]
    InvalidAudioZone { radius: f64, sensitivity: f64 },
}
