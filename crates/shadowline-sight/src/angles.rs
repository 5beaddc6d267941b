//! Angle helpers in degrees.

use shadowline_core::constants::FULL_CIRCLE_DEG;

pub use shadowline_core::types::normalize_degrees;

/// Shortest signed difference `to - from`, in (-180, 180].
pub fn angle_difference_deg(from: f64, to: f64) -> f64 {
    let half = FULL_CIRCLE_DEG / 2.0;
    let diff = (to - from).rem_euclid(FULL_CIRCLE_DEG);
    if diff > half {
        diff - FULL_CIRCLE_DEG
    } else {
        diff
    }
}

/// Whether `bearing` lies strictly inside a cone of `field_of_view` degrees
/// centered on `facing`. The cone edge itself is outside.
pub fn within_field_of_view(facing: f64, field_of_view: f64, bearing: f64) -> bool {
    if field_of_view >= FULL_CIRCLE_DEG {
        return true;
    }
    angle_difference_deg(facing, bearing).abs() < field_of_view / 2.0
}
