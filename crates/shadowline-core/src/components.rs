//! Sensor, obstacle and target data.
//!
//! Detectors are stored as hecs components by the registry. Their pose is
//! owned by the external entity (guard, camera) and pushed in each tick; the
//! detection core only reads it during evaluation.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EVENT_THRESHOLD, FULL_CIRCLE_DEG};
use crate::enums::DetectorKind;
use crate::error::DetectorError;
use crate::types::{normalize_degrees, Position, Velocity};

/// Unique detector identifier chosen by the owning entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DetectorId(pub u32);

/// Identifier handed out by the registry when an audio zone is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AudioZoneId(pub u32);

/// A single sensing agent: guard eyes, a camera, a microphone, a motion sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub id: DetectorId,
    pub kind: DetectorKind,
    pub position: Position,
    /// Effective range. Exclusive upper bound on detection distance.
    pub range: f64,
    /// Field of view in degrees, (0, 360]. 360 is omnidirectional.
    pub field_of_view: f64,
    /// Facing direction in degrees, normalized to [0, 360).
    pub facing: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Strength this sensor must exceed before it reports a `SensorDetection`.
    #[serde(default = "default_event_threshold")]
    pub event_threshold: f64,
}

fn default_active() -> bool {
    true
}

fn default_event_threshold() -> f64 {
    DEFAULT_EVENT_THRESHOLD
}

impl Detector {
    /// Create an active detector with the default event threshold.
    pub fn new(
        id: DetectorId,
        kind: DetectorKind,
        position: Position,
        range: f64,
        field_of_view: f64,
        facing: f64,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            range,
            field_of_view,
            facing: normalize_degrees(facing),
            active: true,
            event_threshold: DEFAULT_EVENT_THRESHOLD,
        }
    }

    /// Guard or camera eyes.
    pub fn visual(id: u32, position: Position, range: f64, field_of_view: f64, facing: f64) -> Self {
        Self::new(
            DetectorId(id),
            DetectorKind::Visual,
            position,
            range,
            field_of_view,
            facing,
        )
    }

    /// Omnidirectional microphone; `range` acts as the hearing radius.
    pub fn audio(id: u32, position: Position, range: f64) -> Self {
        Self::new(
            DetectorId(id),
            DetectorKind::Audio,
            position,
            range,
            FULL_CIRCLE_DEG,
            0.0,
        )
    }

    /// Motion sensor covering a cone.
    pub fn motion(id: u32, position: Position, range: f64, field_of_view: f64, facing: f64) -> Self {
        Self::new(
            DetectorId(id),
            DetectorKind::Motion,
            position,
            range,
            field_of_view,
            facing,
        )
    }

    pub fn with_event_threshold(mut self, threshold: f64) -> Self {
        self.event_threshold = threshold;
        self
    }

    pub fn is_omnidirectional(&self) -> bool {
        self.field_of_view >= FULL_CIRCLE_DEG
    }

    /// Check geometric preconditions.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(DetectorError::InvalidRange(self.range));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view <= FULL_CIRCLE_DEG) {
            return Err(DetectorError::InvalidFieldOfView(self.field_of_view));
        }
        if !self.position.is_finite() {
            return Err(DetectorError::NonFinitePosition);
        }
        if !self.facing.is_finite() {
            return Err(DetectorError::NonFiniteFacing(self.facing));
        }
        if !(0.0..1.0).contains(&self.event_threshold) {
            return Err(DetectorError::InvalidEventThreshold(self.event_threshold));
        }
        Ok(())
    }
}

/// A region that hears the target when it is loud enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioZone {
    pub center: Position,
    pub radius: f64,
    /// Minimum noise level that triggers the zone.
    pub sensitivity: f64,
}

impl AudioZone {
    pub fn new(center: Position, radius: f64, sensitivity: f64) -> Self {
        Self {
            center,
            radius,
            sensitivity,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && self.sensitivity.is_finite()
            && self.sensitivity >= 0.0
    }
}

/// Level geometry that blocks line of sight. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Obstacle {
    /// Axis-aligned box. A zero-width box acts as a wall.
    Rect { min: Position, max: Position },
    /// Thin wall between two points.
    Wall { a: Position, b: Position },
    /// Arbitrary simple polygon, vertices in order.
    Polygon { vertices: Vec<Position> },
}

impl Obstacle {
    /// Build a rect from any two opposite corners.
    pub fn rect(a: Position, b: Position) -> Self {
        Obstacle::Rect {
            min: Position::new(a.x.min(b.x), a.y.min(b.y)),
            max: Position::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn wall(a: Position, b: Position) -> Self {
        Obstacle::Wall { a, b }
    }

    pub fn polygon(vertices: Vec<Position>) -> Self {
        Obstacle::Polygon { vertices }
    }
}

/// The entity being sought, supplied fresh each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub position: Position,
    /// Noise emission, 0 = silent. Grows with speed, reduced by quiet modes.
    pub noise_level: f64,
    #[serde(default)]
    pub velocity: Velocity,
}

impl Target {
    pub fn new(position: Position, noise_level: f64) -> Self {
        Self {
            position,
            noise_level,
            velocity: Velocity::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Which sensor produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum DetectionSource {
    Detector(DetectorId),
    AudioZone(AudioZoneId),
}

/// Per-sensor outcome of one evaluation. Recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub source: DetectionSource,
    pub kind: DetectorKind,
    pub detected: bool,
    /// 0..1, higher is more certain.
    pub strength: f64,
    pub distance: f64,
}

impl DetectionResult {
    pub fn new(source: DetectionSource, kind: DetectorKind, strength: f64, distance: f64) -> Self {
        Self {
            source,
            kind,
            detected: strength > 0.0,
            strength,
            distance,
        }
    }
}
