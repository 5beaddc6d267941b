//! Tunable detection parameters.
//!
//! Level designers override these per level through a JSON file; any field
//! left out keeps its default from [`crate::constants`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// All tunables of the detection core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Strength above which the state rises to CAUTION.
    pub caution_threshold: f64,
    /// Strength above which the state rises to ALERT.
    pub alert_threshold: f64,
    /// Strength above which the state rises to DISCOVERED.
    pub discovered_threshold: f64,
    /// Seconds an elevated state persists after the last strong detection.
    pub alert_timeout_secs: f64,
    /// Noise level mapped to full audio strength.
    pub audio_reference_max: f64,
    /// Sensitivity of audio-kind detectors.
    pub default_audio_sensitivity: f64,
    /// Minimum target speed for motion sensors.
    pub motion_min_speed: f64,
    /// Strength an audio zone must exceed to raise a `SensorDetection`.
    pub default_event_threshold: f64,
    /// Suspicion gained per second at full strength.
    pub suspicion_gain_per_sec: f64,
    /// Suspicion lost per second while undetected.
    pub suspicion_decay_per_sec: f64,
    /// Seconds of continuous DISCOVERED before the mission fails.
    pub discovered_failure_secs: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            caution_threshold: CAUTION_THRESHOLD,
            alert_threshold: ALERT_THRESHOLD,
            discovered_threshold: DISCOVERED_THRESHOLD,
            alert_timeout_secs: ALERT_TIMEOUT_SECS,
            audio_reference_max: AUDIO_REFERENCE_MAX,
            default_audio_sensitivity: DEFAULT_AUDIO_SENSITIVITY,
            motion_min_speed: MOTION_MIN_SPEED,
            default_event_threshold: DEFAULT_EVENT_THRESHOLD,
            suspicion_gain_per_sec: SUSPICION_GAIN_PER_SEC,
            suspicion_decay_per_sec: SUSPICION_DECAY_PER_SEC,
            discovered_failure_secs: DISCOVERED_FAILURE_SECS,
        }
    }
}

impl DetectionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DetectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check threshold ordering and that rates and durations are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.caution_threshold
            && self.caution_threshold < self.alert_threshold
            && self.alert_threshold < self.discovered_threshold
            && self.discovered_threshold <= 1.0;
        if !ordered {
            return Err(ConfigError::ThresholdOrder {
                caution: self.caution_threshold,
                alert: self.alert_threshold,
                discovered: self.discovered_threshold,
            });
        }

        positive("alert_timeout_secs", self.alert_timeout_secs)?;
        positive("audio_reference_max", self.audio_reference_max)?;
        positive("discovered_failure_secs", self.discovered_failure_secs)?;
        non_negative("default_audio_sensitivity", self.default_audio_sensitivity)?;
        non_negative("motion_min_speed", self.motion_min_speed)?;
        non_negative("default_event_threshold", self.default_event_threshold)?;
        non_negative("suspicion_gain_per_sec", self.suspicion_gain_per_sec)?;
        non_negative("suspicion_decay_per_sec", self.suspicion_decay_per_sec)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
