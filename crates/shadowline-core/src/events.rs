//! Events emitted by the detection core for AI, UI and mission consumers.

use serde::{Deserialize, Serialize};

use crate::components::DetectionSource;
use crate::enums::AlertState;

/// Everything the core publishes. Closed set; consumers match on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DetectionEvent {
    /// The aggregate alert state changed. Fired once per actual transition.
    StateChanged {
        previous: AlertState,
        current: AlertState,
        tick: u64,
    },
    /// A single sensor's strength exceeded its event threshold this tick.
    SensorDetection {
        source: DetectionSource,
        strength: f64,
        distance: f64,
        tick: u64,
    },
}

impl DetectionEvent {
    pub fn tick(&self) -> u64 {
        match self {
            DetectionEvent::StateChanged { tick, .. }
            | DetectionEvent::SensorDetection { tick, .. } => *tick,
        }
    }

    pub fn is_state_change(&self) -> bool {
        matches!(self, DetectionEvent::StateChanged { .. })
    }
}
