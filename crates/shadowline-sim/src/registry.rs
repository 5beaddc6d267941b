//! Sensor registry and aggregator.
//!
//! Detectors live as entities in a hecs world, indexed by their
//! `DetectorId`. Audio zones and obstacles are plain collections. The
//! registry never owns detector lifecycle: entities come and go only
//! through explicit add/remove calls from their owners.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::{debug, warn};

use shadowline_alert::suspicion::{SuspicionRates, SuspicionTimer};
use shadowline_core::components::*;
use shadowline_core::config::DetectionConfig;
use shadowline_core::enums::DetectorKind;
use shadowline_core::error::DetectionError;
use shadowline_core::types::{normalize_degrees, Position};
use shadowline_sight::audio::audio_strength;
use shadowline_sight::visibility::sensor_strength;

/// Strongest single result. Sensors never add up; an empty set is 0.
pub fn max_strength(results: &[DetectionResult]) -> f64 {
    results
        .iter()
        .map(|r| r.strength)
        .fold(0.0, f64::max)
}

/// All sensors and occluders of one level.
#[derive(Default)]
pub struct SensorRegistry {
    world: World,
    index: HashMap<DetectorId, Entity>,
    audio_zones: HashMap<AudioZoneId, AudioZone>,
    next_zone_id: u32,
    obstacles: Vec<Obstacle>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector. Rejects broken geometry and duplicate ids.
    pub fn add_detector(&mut self, mut detector: Detector) -> Result<(), DetectionError> {
        let id = detector.id;
        if self.index.contains_key(&id) {
            return Err(DetectionError::DuplicateDetector(id));
        }
        detector
            .validate()
            .map_err(|source| DetectionError::InvalidDetector { id, source })?;

        debug!(?id, kind = ?detector.kind, "detector registered");
        detector.facing = normalize_degrees(detector.facing);
        let entity = self.world.spawn((detector, SuspicionTimer::new()));
        self.index.insert(id, entity);
        Ok(())
    }

    /// Unregister a detector. Returns whether it was present; unknown ids are a no-op.
    pub fn remove_detector(&mut self, id: DetectorId) -> bool {
        match self.index.remove(&id) {
            Some(entity) => {
                let _ = self.world.despawn(entity);
                debug!(?id, "detector unregistered");
                true
            }
            None => false,
        }
    }

    /// Owner-driven pose update. Facing is normalized; values are not
    /// validated here, evaluation degrades a broken pose to no detection.
    pub fn update_detector_pose(
        &mut self,
        id: DetectorId,
        position: Position,
        facing: f64,
    ) -> Result<(), DetectionError> {
        let detector = self.detector_mut(id)?;
        detector.position = position;
        detector.facing = if facing.is_finite() {
            normalize_degrees(facing)
        } else {
            facing
        };
        Ok(())
    }

    pub fn set_detector_active(&mut self, id: DetectorId, active: bool) -> Result<(), DetectionError> {
        self.detector_mut(id)?.active = active;
        Ok(())
    }

    fn detector_mut(&mut self, id: DetectorId) -> Result<&mut Detector, DetectionError> {
        let entity = *self
            .index
            .get(&id)
            .ok_or(DetectionError::UnknownDetector(id))?;
        self.world
            .query_one_mut::<&mut Detector>(entity)
            .map_err(|_| DetectionError::UnknownDetector(id))
    }

    /// Copy of a registered detector.
    pub fn detector(&self, id: DetectorId) -> Option<Detector> {
        let entity = *self.index.get(&id)?;
        self.world
            .get::<&Detector>(entity)
            .ok()
            .map(|d| (*d).clone())
    }

    /// Per-detector suspicion level, if registered.
    pub fn detector_suspicion(&self, id: DetectorId) -> Option<f64> {
        let entity = *self.index.get(&id)?;
        self.world
            .get::<&SuspicionTimer>(entity)
            .ok()
            .map(|s| s.level())
    }

    pub fn contains_detector(&self, id: DetectorId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn detector_count(&self) -> usize {
        self.index.len()
    }

    /// Register a hearing zone and return its handle.
    pub fn add_audio_zone(&mut self, zone: AudioZone) -> Result<AudioZoneId, DetectionError> {
        if !zone.is_valid() {
            return Err(DetectionError::InvalidAudioZone {
                radius: zone.radius,
                sensitivity: zone.sensitivity,
            });
        }
        let id = AudioZoneId(self.next_zone_id);
        self.next_zone_id += 1;
        self.audio_zones.insert(id, zone);
        debug!(?id, radius = zone.radius, "audio zone registered");
        Ok(id)
    }

    /// Remove a hearing zone. Unknown ids are a no-op.
    pub fn remove_audio_zone(&mut self, id: AudioZoneId) -> bool {
        self.audio_zones.remove(&id).is_some()
    }

    pub fn audio_zone_count(&self) -> usize {
        self.audio_zones.len()
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// One result per active detector and per audio zone.
    ///
    /// Read-only over the registry. Result order is unspecified.
    pub fn evaluate(&self, target: &Target, config: &DetectionConfig) -> Vec<DetectionResult> {
        let mut results = Vec::with_capacity(self.index.len() + self.audio_zones.len());

        for (_entity, detector) in self.world.query::<&Detector>().iter() {
            if !detector.active {
                continue;
            }
            let distance = detector.position.distance_to(&target.position);
            let strength = match detector.validate() {
                Ok(()) => sensor_strength(detector, target, &self.obstacles, config),
                Err(reason) => {
                    warn!(id = ?detector.id, %reason, "degraded detector treated as blind");
                    0.0
                }
            };
            results.push(DetectionResult::new(
                DetectionSource::Detector(detector.id),
                detector.kind,
                strength,
                distance,
            ));
        }

        for (id, zone) in &self.audio_zones {
            let strength = audio_strength(
                &zone.center,
                zone.radius,
                zone.sensitivity,
                &target.position,
                target.noise_level,
                config.audio_reference_max,
            );
            results.push(DetectionResult::new(
                DetectionSource::AudioZone(*id),
                DetectorKind::Audio,
                strength,
                zone.center.distance_to(&target.position),
            ));
        }

        results
    }

    /// Integrate per-detector suspicion from this tick's results.
    /// Detectors without a result (inactive) decay.
    pub fn update_suspicion(&mut self, results: &[DetectionResult], dt: f64, rates: &SuspicionRates) {
        let strengths: HashMap<DetectorId, f64> = results
            .iter()
            .filter_map(|r| match r.source {
                DetectionSource::Detector(id) => Some((id, r.strength)),
                DetectionSource::AudioZone(_) => None,
            })
            .collect();

        for (_entity, (detector, suspicion)) in self
            .world
            .query_mut::<(&Detector, &mut SuspicionTimer)>()
        {
            let strength = strengths.get(&detector.id).copied().unwrap_or(0.0);
            suspicion.update(strength, dt, rates);
        }
    }

    pub fn reset_suspicion(&mut self) {
        for (_entity, suspicion) in self.world.query_mut::<&mut SuspicionTimer>() {
            suspicion.reset();
        }
    }

    /// Registered detectors with their suspicion, sorted by id.
    pub fn detectors_with_suspicion(&self) -> Vec<(Detector, f64)> {
        let mut all: Vec<(Detector, f64)> = self
            .world
            .query::<(&Detector, &SuspicionTimer)>()
            .iter()
            .map(|(_entity, (detector, suspicion))| (detector.clone(), suspicion.level()))
            .collect();
        all.sort_by_key(|(detector, _)| detector.id);
        all
    }
}
