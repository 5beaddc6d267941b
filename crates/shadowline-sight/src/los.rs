//! Line-of-sight against level obstacles.
//!
//! Occlusion is binary: any obstacle touching the sight line blocks it
//! completely, however little of the line it covers. Contact at the
//! viewer's own point does not count, so a camera mounted on a wall face
//! sees everything in front of it.

use shadowline_core::components::Obstacle;
use shadowline_core::constants::EYE_CLEARANCE;
use shadowline_core::types::Position;

use crate::geometry::segment_hits_obstacle;

/// Check line-of-sight between two points.
///
/// Returns true if no obstacle intersects the segment `from`-`to`, with the
/// first `EYE_CLEARANCE` units next to `from` left out.
pub fn has_line_of_sight(obstacles: &[Obstacle], from: &Position, to: &Position) -> bool {
    let eye = from.as_dvec2();
    let b = to.as_dvec2();
    let span = b - eye;
    let length = span.length();
    if length <= EYE_CLEARANCE {
        return true;
    }
    let a = eye + span * (EYE_CLEARANCE / length);
    !obstacles
        .iter()
        .any(|obstacle| segment_hits_obstacle(a, b, obstacle))
}
