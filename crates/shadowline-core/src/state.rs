//! Detection snapshot: the visible state handed to UI and debug consumers.

use serde::{Deserialize, Serialize};

use crate::components::{DetectionResult, DetectorId};
use crate::enums::{AlertState, DetectorKind};
use crate::events::DetectionEvent;
use crate::types::{Position, SimTime};

/// Output of one engine tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    pub time: SimTime,
    pub state: AlertState,
    /// Strongest single-sensor strength this tick. Sensors never sum.
    pub max_strength: f64,
    pub results: Vec<DetectionResult>,
    pub events: Vec<DetectionEvent>,
}

/// Complete detection state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionSnapshot {
    pub time: SimTime,
    pub alert: AlertView,
    pub detectors: Vec<DetectorView>,
    pub audio_zone_count: u32,
    pub obstacle_count: u32,
}

/// Aggregate alert status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertView {
    pub state: AlertState,
    /// Seconds until an elevated state may relax.
    pub alert_timer: f64,
    /// Smoothed aggregate suspicion (0..1).
    pub suspicion: f64,
    /// Seconds spent in the current state.
    pub time_in_state: f64,
    /// When the current state was entered.
    pub held_since: SimTime,
}

/// One detector for debug overlays (vision cones, suspicion meters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorView {
    pub id: DetectorId,
    pub kind: DetectorKind,
    pub position: Position,
    pub range: f64,
    pub field_of_view: f64,
    pub facing: f64,
    pub active: bool,
    pub suspicion: f64,
}
