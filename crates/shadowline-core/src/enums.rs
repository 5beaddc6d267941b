//! Enumeration types used throughout the detection core.

use serde::{Deserialize, Serialize};

/// Discrete alert classification exposed to enemy AI, UI and mission logic.
///
/// Variants are ordered by severity, so `max` picks the more severe state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AlertState {
    /// Nobody is aware of the target.
    #[default]
    Safe,
    /// Something was glimpsed or heard.
    Caution,
    /// Target confirmed nearby; guards search.
    Alert,
    /// Target clearly seen; sustained discovery fails the mission.
    Discovered,
}

impl AlertState {
    /// Short indicator for HUD display.
    pub fn indicator(&self) -> &'static str {
        match self {
            AlertState::Safe => "",
            AlertState::Caution => "?",
            AlertState::Alert => "!",
            AlertState::Discovered => "!!",
        }
    }

    /// Whether guards should leave their patrol routes.
    pub fn is_elevated(&self) -> bool {
        matches!(self, AlertState::Alert | AlertState::Discovered)
    }
}

/// How a detector senses the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorKind {
    /// Eyes or camera: range, field of view and occlusion.
    #[default]
    Visual,
    /// Microphone: noise level within a radius, ignores obstacles.
    Audio,
    /// Motion sensor: visual gates, but only fires on a moving target.
    Motion,
}

/// Outcome reported by the sustained-discovery monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    #[default]
    InProgress,
    /// Discovered state held continuously for the failure duration.
    Failed,
}
