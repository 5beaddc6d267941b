//! Per-sensor detection strength.
//!
//! Visual detection runs three binary gates (range, field of view,
//! occlusion) and one continuous signal, linear distance falloff. Sensor
//! kinds are dispatched here in one place.
//!
//! Preconditions: the detector satisfies `Detector::validate` and the
//! target position is finite. Violations are not defended against here.

use shadowline_core::components::{Detector, Obstacle, Target};
use shadowline_core::config::DetectionConfig;
use shadowline_core::enums::DetectorKind;
use shadowline_core::types::Position;

use crate::angles::within_field_of_view;
use crate::audio::audio_strength;
use crate::los::has_line_of_sight;

/// Linear falloff: 1 at the detector, 0 at the edge of range.
pub fn distance_falloff(distance: f64, range: f64) -> f64 {
    (1.0 - distance / range).clamp(0.0, 1.0)
}

/// How strongly `detector` can see `target`, in [0, 1].
///
/// Range is an exclusive bound. A target on top of the detector is seen at
/// full strength without angle or occlusion checks.
pub fn calculate_visibility(detector: &Detector, target: &Position, obstacles: &[Obstacle]) -> f64 {
    let distance = detector.position.distance_to(target);
    if distance >= detector.range {
        return 0.0;
    }
    if distance == 0.0 {
        return 1.0;
    }

    if !detector.is_omnidirectional() {
        let bearing = detector.position.angle_to_deg(target);
        if !within_field_of_view(detector.facing, detector.field_of_view, bearing) {
            return 0.0;
        }
    }

    if !has_line_of_sight(obstacles, &detector.position, target) {
        return 0.0;
    }

    distance_falloff(distance, detector.range)
}

/// Strength for any detector kind against the full target state.
pub fn sensor_strength(
    detector: &Detector,
    target: &Target,
    obstacles: &[Obstacle],
    config: &DetectionConfig,
) -> f64 {
    match detector.kind {
        DetectorKind::Visual => calculate_visibility(detector, &target.position, obstacles),
        DetectorKind::Audio => audio_strength(
            &detector.position,
            detector.range,
            config.default_audio_sensitivity,
            &target.position,
            target.noise_level,
            config.audio_reference_max,
        ),
        DetectorKind::Motion => {
            if target.velocity.speed() < config.motion_min_speed {
                return 0.0;
            }
            calculate_visibility(detector, &target.position, obstacles)
        }
    }
}
