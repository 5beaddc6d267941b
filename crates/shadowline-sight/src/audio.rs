//! Noise-based detection.
//!
//! Sound is not occluded by obstacles; a sensor hears the target when it is
//! inside the hearing radius and at least as loud as the sensitivity.

use shadowline_core::types::Position;

/// Strength with which a hearing sensor perceives the target.
///
/// Radius is inclusive, sensitivity is inclusive. Strength scales with
/// noise relative to `reference_max` and saturates at 1.
pub fn audio_strength(
    center: &Position,
    radius: f64,
    sensitivity: f64,
    target: &Position,
    noise_level: f64,
    reference_max: f64,
) -> f64 {
    let distance = center.distance_to(target);
    if distance > radius || noise_level < sensitivity || noise_level <= 0.0 {
        return 0.0;
    }
    (noise_level / reference_max).min(1.0)
}
