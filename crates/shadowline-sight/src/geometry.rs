//! Segment intersection against obstacle shapes.
//!
//! All tests are inclusive: a segment that merely touches an edge or a
//! corner counts as hitting the shape.

use glam::DVec2;

use shadowline_core::components::Obstacle;
use shadowline_core::constants::GEOMETRY_EPSILON;

/// Signed area of the triangle (p, q, r) times two.
fn orient(p: DVec2, q: DVec2, r: DVec2) -> f64 {
    (q - p).perp_dot(r - p)
}

/// Whether `r`, known to be collinear with (p, q), lies within their bounding box.
fn on_segment(p: DVec2, q: DVec2, r: DVec2) -> bool {
    r.x >= p.x.min(q.x) - GEOMETRY_EPSILON
        && r.x <= p.x.max(q.x) + GEOMETRY_EPSILON
        && r.y >= p.y.min(q.y) - GEOMETRY_EPSILON
        && r.y <= p.y.max(q.y) + GEOMETRY_EPSILON
}

fn sign(v: f64) -> i8 {
    if v > GEOMETRY_EPSILON {
        1
    } else if v < -GEOMETRY_EPSILON {
        -1
    } else {
        0
    }
}

/// Whether segments (a, b) and (c, d) share at least one point.
pub fn segment_intersects(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let o1 = sign(orient(a, b, c));
    let o2 = sign(orient(a, b, d));
    let o3 = sign(orient(c, d, a));
    let o4 = sign(orient(c, d, b));

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases
    (o1 == 0 && on_segment(a, b, c))
        || (o2 == 0 && on_segment(a, b, d))
        || (o3 == 0 && on_segment(c, d, a))
        || (o4 == 0 && on_segment(c, d, b))
}

/// Liang-Barsky clip of segment (a, b) against an axis-aligned box.
pub fn segment_intersects_rect(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> bool {
    let delta = b - a;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;

    for (start, d, lo, hi) in [(a.x, delta.x, min.x, max.x), (a.y, delta.y, min.y, max.y)] {
        if d.abs() < GEOMETRY_EPSILON {
            // Parallel to this slab: must already be inside it.
            if start < lo - GEOMETRY_EPSILON || start > hi + GEOMETRY_EPSILON {
                return false;
            }
            continue;
        }
        let t1 = (lo - start) / d;
        let t2 = (hi - start) / d;
        let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit + GEOMETRY_EPSILON {
            return false;
        }
    }

    true
}

/// Even-odd point-in-polygon test. Boundary points may go either way;
/// callers pair this with an edge test.
pub fn point_in_polygon(point: DVec2, vertices: &[DVec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = vj.x + (point.y - vj.y) * (vi.x - vj.x) / (vi.y - vj.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether a segment crosses, touches, or lies inside a polygon.
///
/// Fewer than three vertices degrade to a polyline.
pub fn segment_intersects_polygon(a: DVec2, b: DVec2, vertices: &[DVec2]) -> bool {
    match vertices.len() {
        0 => false,
        1 => segment_intersects(a, b, vertices[0], vertices[0]),
        2 => segment_intersects(a, b, vertices[0], vertices[1]),
        n => {
            let edge_hit = (0..n).any(|i| {
                let c = vertices[i];
                let d = vertices[(i + 1) % n];
                segment_intersects(a, b, c, d)
            });
            edge_hit || point_in_polygon(a, vertices) || point_in_polygon(b, vertices)
        }
    }
}

/// Whether the segment (a, b) is blocked by `obstacle`.
pub fn segment_hits_obstacle(a: DVec2, b: DVec2, obstacle: &Obstacle) -> bool {
    match obstacle {
        Obstacle::Rect { min, max } => {
            segment_intersects_rect(a, b, min.as_dvec2(), max.as_dvec2())
        }
        Obstacle::Wall { a: c, b: d } => segment_intersects(a, b, c.as_dvec2(), d.as_dvec2()),
        Obstacle::Polygon { vertices } => {
            let points: Vec<DVec2> = vertices.iter().map(|v| v.as_dvec2()).collect();
            segment_intersects_polygon(a, b, &points)
        }
    }
}
