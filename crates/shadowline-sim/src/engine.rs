//! Detection engine, run once per game tick.
//!
//! `DetectionEngine` owns the sensor registry and the alert machine,
//! applies queued registry commands at the tick boundary, runs one
//! evaluation pass, and publishes detection events. Completely headless,
//! so every scenario can be driven deterministically from tests.

use std::collections::VecDeque;
use std::sync::mpsc;

use tracing::{debug, trace, warn};

use shadowline_alert::fsm::AlertMachine;
use shadowline_alert::suspicion::SuspicionRates;
use shadowline_core::commands::RegistryCommand;
use shadowline_core::components::{
    AudioZone, AudioZoneId, DetectionResult, DetectionSource, Detector, DetectorId, Obstacle,
    Target,
};
use shadowline_core::config::DetectionConfig;
use shadowline_core::enums::AlertState;
use shadowline_core::error::DetectionError;
use shadowline_core::events::DetectionEvent;
use shadowline_core::state::{DetectionReport, DetectionSnapshot};
use shadowline_core::types::{Position, SimTime};

use crate::bus::{EventBus, SubscriptionId};
use crate::level::LevelDefinition;
use crate::registry::{max_strength, SensorRegistry};
use crate::snapshot::build_snapshot;

/// The detection engine. One per mission.
pub struct DetectionEngine {
    config: DetectionConfig,
    registry: SensorRegistry,
    alert: AlertMachine,
    rates: SuspicionRates,
    time: SimTime,
    command_queue: VecDeque<RegistryCommand>,
    pending_events: Vec<DetectionEvent>,
    bus: EventBus,
}

impl DetectionEngine {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            alert: AlertMachine::from_config(&config),
            rates: SuspicionRates::from_config(&config),
            config,
            registry: SensorRegistry::new(),
            time: SimTime::default(),
            command_queue: VecDeque::new(),
            pending_events: Vec::new(),
            bus: EventBus::new(),
        }
    }

    /// Engine with a level's sensors already registered.
    pub fn with_level(config: DetectionConfig, level: &LevelDefinition) -> Result<Self, DetectionError> {
        let mut engine = Self::new(config);
        engine.load_level(level)?;
        Ok(engine)
    }

    /// Register every detector, zone and obstacle of a level. A rejected
    /// level leaves the registry untouched.
    pub fn load_level(&mut self, level: &LevelDefinition) -> Result<(), DetectionError> {
        level.validate(|id| self.registry.contains_detector(id))?;

        for detector in &level.detectors {
            self.registry.add_detector(detector.clone())?;
        }
        for zone in &level.audio_zones {
            self.registry.add_audio_zone(*zone)?;
        }
        for obstacle in &level.obstacles {
            self.registry.add_obstacle(obstacle.clone());
        }
        debug!(
            level = %level.name,
            detectors = level.detectors.len(),
            audio_zones = level.audio_zones.len(),
            obstacles = level.obstacles.len(),
            "level loaded"
        );
        Ok(())
    }

    /// Queue a registry mutation for the next tick boundary.
    pub fn queue_command(&mut self, command: RegistryCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = RegistryCommand>) {
        self.command_queue.extend(commands);
    }

    // --- Immediate registry access, for setup outside the tick loop ---

    pub fn add_detector(&mut self, detector: Detector) -> Result<(), DetectionError> {
        self.registry.add_detector(detector)
    }

    pub fn remove_detector(&mut self, id: DetectorId) -> bool {
        self.registry.remove_detector(id)
    }

    pub fn update_detector_pose(
        &mut self,
        id: DetectorId,
        position: Position,
        facing: f64,
    ) -> Result<(), DetectionError> {
        self.registry.update_detector_pose(id, position, facing)
    }

    pub fn set_detector_active(&mut self, id: DetectorId, active: bool) -> Result<(), DetectionError> {
        self.registry.set_detector_active(id, active)
    }

    pub fn add_audio_zone(&mut self, zone: AudioZone) -> Result<AudioZoneId, DetectionError> {
        self.registry.add_audio_zone(zone)
    }

    pub fn remove_audio_zone(&mut self, id: AudioZoneId) -> bool {
        self.registry.remove_audio_zone(id)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.registry.add_obstacle(obstacle);
    }

    pub fn clear_obstacles(&mut self) {
        self.registry.clear_obstacles();
    }

    /// Evaluate every sensor against the target without advancing anything.
    pub fn evaluate(&self, target: &Target) -> Vec<DetectionResult> {
        self.registry.evaluate(target, &self.config)
    }

    /// Advance one tick of `dt` seconds against the target's current state.
    pub fn tick(&mut self, target: &Target, dt: f64) -> DetectionReport {
        self.process_commands();

        debug_assert!(
            target.position.is_finite() && target.noise_level.is_finite(),
            "target state must be finite: {target:?}"
        );

        let results = self.registry.evaluate(target, &self.config);
        let strongest = max_strength(&results);

        self.time.advance(dt);
        let transition = self.alert.update(strongest, dt, self.time);
        self.registry.update_suspicion(&results, dt, &self.rates);

        let mut events = self.sensor_events(&results);
        if let Some(change) = transition {
            debug!(
                tick = self.time.tick,
                previous = ?change.previous,
                current = ?change.current,
                strength = strongest,
                "alert state changed"
            );
            events.push(DetectionEvent::StateChanged {
                previous: change.previous,
                current: change.current,
                tick: self.time.tick,
            });
        }
        trace!(
            tick = self.time.tick,
            state = ?self.alert.state(),
            max_strength = strongest,
            timer = self.alert.alert_timer(),
            "detection tick"
        );

        self.bus.publish(&events);
        self.pending_events.extend_from_slice(&events);

        DetectionReport {
            time: self.time,
            state: self.alert.state(),
            max_strength: strongest,
            results,
            events,
        }
    }

    /// One `SensorDetection` per result above its source's event threshold.
    fn sensor_events(&self, results: &[DetectionResult]) -> Vec<DetectionEvent> {
        results
            .iter()
            .filter(|r| r.strength > self.event_threshold(r.source))
            .map(|r| DetectionEvent::SensorDetection {
                source: r.source,
                strength: r.strength,
                distance: r.distance,
                tick: self.time.tick,
            })
            .collect()
    }

    fn event_threshold(&self, source: DetectionSource) -> f64 {
        match source {
            DetectionSource::Detector(id) => self
                .registry
                .detector(id)
                .map(|d| d.event_threshold)
                .unwrap_or(self.config.default_event_threshold),
            DetectionSource::AudioZone(_) => self.config.default_event_threshold,
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!(%err, "registry command rejected");
            }
        }
    }

    fn handle_command(&mut self, command: RegistryCommand) -> Result<(), DetectionError> {
        match command {
            RegistryCommand::AddDetector { detector } => self.registry.add_detector(detector),
            RegistryCommand::RemoveDetector { id } => {
                self.registry.remove_detector(id);
                Ok(())
            }
            RegistryCommand::UpdatePose {
                id,
                position,
                facing,
            } => self.registry.update_detector_pose(id, position, facing),
            RegistryCommand::SetActive { id, active } => {
                self.registry.set_detector_active(id, active)
            }
            RegistryCommand::AddAudioZone { zone } => self.registry.add_audio_zone(zone).map(|_| ()),
            RegistryCommand::RemoveAudioZone { id } => {
                self.registry.remove_audio_zone(id);
                Ok(())
            }
            RegistryCommand::AddObstacle { obstacle } => {
                self.registry.add_obstacle(obstacle);
                Ok(())
            }
            RegistryCommand::ClearObstacles => {
                self.registry.clear_obstacles();
                Ok(())
            }
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<DetectionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&DetectionEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(listener)
    }

    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::Receiver<DetectionEvent>) {
        self.bus.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn current_state(&self) -> AlertState {
        self.alert.state()
    }

    pub fn alert(&self) -> &AlertMachine {
        &self.alert
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> DetectionSnapshot {
        build_snapshot(&self.registry, &self.alert, &self.time)
    }

    /// Mission restart. Registered sensors and listeners stay; state,
    /// timers, suspicion, time and undrained events are cleared.
    pub fn reset(&mut self) {
        self.alert.reset();
        self.registry.reset_suspicion();
        self.time = SimTime::default();
        self.pending_events.clear();
        debug!("detection state reset");
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}
