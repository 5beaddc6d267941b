//! Level sensor layout: the detectors, hearing zones and walls a level
//! registers at load time.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shadowline_core::components::{AudioZone, Detector, DetectorId, Obstacle};
use shadowline_core::error::DetectionError;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything the detection core needs from a level file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub detectors: Vec<Detector>,
    #[serde(default)]
    pub audio_zones: Vec<AudioZone>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl LevelDefinition {
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every entry before anything is registered. `taken` reports ids
    /// already present in the target registry.
    pub fn validate(&self, taken: impl Fn(DetectorId) -> bool) -> Result<(), DetectionError> {
        let mut seen = HashSet::with_capacity(self.detectors.len());
        for detector in &self.detectors {
            let id = detector.id;
            if taken(id) || !seen.insert(id) {
                return Err(DetectionError::DuplicateDetector(id));
            }
            detector
                .validate()
                .map_err(|source| DetectionError::InvalidDetector { id, source })?;
        }
        for zone in &self.audio_zones {
            if !zone.is_valid() {
                return Err(DetectionError::InvalidAudioZone {
                    radius: zone.radius,
                    sensitivity: zone.sensitivity,
                });
            }
        }
        Ok(())
    }

    /// The corridor used by tutorials: one guard looking down a corridor
    /// with a wall halfway, a camera, and a microphone by the vent.
    pub fn tutorial_corridor() -> Self {
        use shadowline_core::types::Position;

        Self {
            name: "tutorial-corridor".into(),
            detectors: vec![
                Detector::visual(1, Position::new(0.0, 0.0), 100.0, 90.0, 0.0),
                Detector::visual(2, Position::new(150.0, 60.0), 120.0, 60.0, 270.0),
            ],
            audio_zones: vec![AudioZone::new(Position::new(200.0, 200.0), 50.0, 3.0)],
            obstacles: vec![Obstacle::wall(
                Position::new(50.0, -10.0),
                Position::new(50.0, 10.0),
            )],
        }
    }
}
