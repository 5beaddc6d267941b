//! Builds a `DetectionSnapshot` for UI and debug overlays.
//!
//! Read-only. Never modifies the registry or the alert machine.

use shadowline_alert::fsm::AlertMachine;
use shadowline_core::state::{AlertView, DetectionSnapshot, DetectorView};
use shadowline_core::types::SimTime;

use crate::registry::SensorRegistry;

pub fn build_snapshot(
    registry: &SensorRegistry,
    alert: &AlertMachine,
    time: &SimTime,
) -> DetectionSnapshot {
    DetectionSnapshot {
        time: *time,
        alert: build_alert(alert),
        detectors: build_detectors(registry),
        audio_zone_count: registry.audio_zone_count() as u32,
        obstacle_count: registry.obstacles().len() as u32,
    }
}

fn build_alert(alert: &AlertMachine) -> AlertView {
    AlertView {
        state: alert.state(),
        alert_timer: alert.alert_timer(),
        suspicion: alert.suspicion(),
        time_in_state: alert.time_in_state(),
        held_since: alert.held_since(),
    }
}

/// Detectors sorted by id so consecutive snapshots line up.
fn build_detectors(registry: &SensorRegistry) -> Vec<DetectorView> {
    registry
        .detectors_with_suspicion()
        .into_iter()
        .map(|(detector, suspicion)| DetectorView {
            id: detector.id,
            kind: detector.kind,
            position: detector.position,
            range: detector.range,
            field_of_view: detector.field_of_view,
            facing: detector.facing,
            active: detector.active,
            suspicion,
        })
        .collect()
}
