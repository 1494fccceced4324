//! Planar vector helpers layered on top of `glam`.

use glam::DVec2;

/// Extra 2D operations the rigid-body pipeline needs beyond what `DVec2` ships with.
pub trait Vec2Ext {
    /// Scalar z-component of the 3D cross product of two planar vectors.
    fn cross(self, other: DVec2) -> f64;

    /// `v × s`, the vector obtained by crossing with an out-of-plane scalar.
    fn cross_scalar(self, s: f64) -> DVec2;

    /// Unit vector in the same direction, or `self` untouched when the length is zero.
    fn normalize_or_self(self) -> DVec2;
}

impl Vec2Ext for DVec2 {
    #[inline]
    fn cross(self, other: DVec2) -> f64 {
        self.perp_dot(other)
    }

    #[inline]
    fn cross_scalar(self, s: f64) -> DVec2 {
        DVec2::new(s * self.y, -s * self.x)
    }

    fn normalize_or_self(self) -> DVec2 {
        let len = self.length();
        if len <= f64::EPSILON || !len.is_finite() {
            self
        } else {
            self / len
        }
    }
}

/// `s × v`; turns an angular velocity into the linear velocity of a point at radius `v`.
#[inline]
pub fn scalar_cross(s: f64, v: DVec2) -> DVec2 {
    DVec2::new(-s * v.y, s * v.x)
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed area of a closed polygon (positive when counter-clockwise).
pub fn signed_area(vertices: &[DVec2]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        twice += a.cross(b);
    }
    twice * 0.5
}

/// Area-weighted centroid of a simple polygon, falling back to the vertex mean for degenerate input.
pub fn polygon_centroid(vertices: &[DVec2]) -> DVec2 {
    if vertices.is_empty() {
        return DVec2::ZERO;
    }
    let area = signed_area(vertices);
    if area.abs() <= f64::EPSILON {
        return vertices.iter().copied().sum::<DVec2>() / vertices.len() as f64;
    }
    let mut acc = DVec2::ZERO;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        acc += (*a + b) * a.cross(b);
    }
    acc / (6.0 * area)
}

/// Closest point to `point` on the segment `a`-`b`.
pub fn closest_point_on_segment(point: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
