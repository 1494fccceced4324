use glam::DVec2;

use crate::{core::types::Aabb, utils::math::signed_area};

/// Triangle with its cached circumcircle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [DVec2; 3],
    pub circumcenter: DVec2,
    pub circumradius: f64,
}

impl Triangle {
    pub fn new(a: DVec2, b: DVec2, c: DVec2) -> Self {
        let (circumcenter, circumradius) = circumcircle(a, b, c);
        Self {
            vertices: [a, b, c],
            circumcenter,
            circumradius,
        }
    }

    /// Strict containment; co-circular points are left alone.
    pub fn circumcircle_contains(&self, point: DVec2) -> bool {
        point.distance(self.circumcenter) < self.circumradius
    }

    pub fn has_vertex(&self, point: DVec2) -> bool {
        self.vertices.contains(&point)
    }

    pub fn edges(&self) -> [(DVec2, DVec2); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Vertices reordered counter-clockwise.
    pub fn counter_clockwise(&self) -> [DVec2; 3] {
        let [a, b, c] = self.vertices;
        if signed_area(&self.vertices) < 0.0 {
            [a, c, b]
        } else {
            [a, b, c]
        }
    }
}

/// Circumcentre and radius; collinear input yields an infinite circle.
fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> (DVec2, f64) {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() <= f64::EPSILON {
        return (DVec2::splat(f64::INFINITY), f64::INFINITY);
    }
    let a_sq = a.length_squared();
    let b_sq = b.length_squared();
    let c_sq = c.length_squared();
    let center = DVec2::new(
        (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    );
    (center, center.distance(a))
}

fn same_edge(e1: (DVec2, DVec2), e2: (DVec2, DVec2)) -> bool {
    (e1.0 == e2.0 && e1.1 == e2.1) || (e1.0 == e2.1 && e1.1 == e2.0)
}

/// Triangle enclosing `bounds` with a generous margin.
pub fn super_triangle(bounds: &Aabb) -> Triangle {
    let size = bounds.size();
    let dx = size.x.max(f64::EPSILON) * 10.0;
    let dy = size.y.max(f64::EPSILON) * 10.0;
    Triangle::new(
        DVec2::new(bounds.min.x - dx, bounds.min.y - dy * 3.0),
        DVec2::new(bounds.min.x - dx, bounds.max.y + dy),
        DVec2::new(bounds.max.x + dx * 3.0, bounds.max.y + dy),
    )
}

/// Incremental Bowyer-Watson Delaunay triangulation of `points`.
///
/// Triangles touching the enclosing super triangle are dropped, so for a
/// convex point set the result tiles its hull.
pub fn bowyer_watson(points: &[DVec2]) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    let enclosing = super_triangle(&Aabb::from_points(points.iter().copied()));
    let mut triangles = vec![enclosing];

    for &point in points {
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|t| t.circumcircle_contains(point));
        triangles = good;

        let mut boundary: Vec<(DVec2, DVec2)> = Vec::new();
        for (i, triangle) in bad.iter().enumerate() {
            for edge in triangle.edges() {
                let shared = bad
                    .iter()
                    .enumerate()
                    .any(|(j, other)| i != j && other.edges().iter().any(|e| same_edge(*e, edge)));
                if !shared {
                    boundary.push(edge);
                }
            }
        }

        triangles.extend(
            boundary
                .into_iter()
                .map(|(a, b)| Triangle::new(a, b, point)),
        );
    }

    triangles.retain(|t| !enclosing.vertices.iter().any(|v| t.has_vertex(*v)));
    triangles
}
