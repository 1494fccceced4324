use glam::DVec2;

use crate::utils::allocator::BodyId;

/// Result of a positive narrow-phase test for one body pair.
///
/// `normal` is a unit vector pointing from `body_a` toward `body_b`.
/// `overlap` is negative while the shapes interpenetrate.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub normal: DVec2,
    pub overlap: f64,
    pub points: Vec<DVec2>,
}

impl ContactManifold {
    pub fn new(body_a: BodyId, body_b: BodyId, normal: DVec2, overlap: f64) -> Self {
        Self {
            body_a,
            body_b,
            normal,
            overlap,
            points: Vec::with_capacity(2),
        }
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = DVec2>) -> Self {
        self.points.extend(points);
        self
    }
}
