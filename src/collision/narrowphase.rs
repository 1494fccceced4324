use glam::DVec2;

use super::{clipping::polygon_contact_points, contact::ContactManifold};
use crate::{
    core::{body::Body, shape::Shape},
    utils::{
        allocator::BodyId,
        math::{closest_point_on_segment, Vec2Ext},
    },
};

/// Closed interval of a shape projected onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Projection {
    min: f64,
    max: f64,
}

impl Projection {
    fn of_points(points: &[DVec2], axis: DVec2) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in points {
            let d = p.dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        Self { min, max }
    }

    fn of_circle(center: DVec2, radius: f64, axis: DVec2) -> Self {
        let d = center.dot(axis);
        Self {
            min: d - radius,
            max: d + radius,
        }
    }

    /// Positive overlap length, or `None` when the intervals are disjoint.
    fn overlap(&self, other: &Projection) -> Option<f64> {
        if self.max < other.min || other.max < self.min {
            return None;
        }
        Some((other.max - self.min).min(self.max - other.min))
    }
}

/// Separating axis tests for circles and convex polygons.
pub struct SatAlgorithm;

impl SatAlgorithm {
    const AXIS_EPSILON: f64 = 1e-12;

    /// Circle against circle; contact points sit on each rim along the normal.
    pub fn circle_circle(
        body_a: BodyId,
        center_a: DVec2,
        radius_a: f64,
        body_b: BodyId,
        center_b: DVec2,
        radius_b: f64,
    ) -> Option<ContactManifold> {
        let diff = center_b - center_a;
        let distance = diff.length();
        let overlap = distance - (radius_a + radius_b);
        if overlap >= 0.0 {
            return None;
        }

        let normal = if distance <= Self::AXIS_EPSILON {
            DVec2::X
        } else {
            diff / distance
        };
        Some(
            ContactManifold::new(body_a, body_b, normal, overlap)
                .with_points([center_a + normal * radius_a, center_b - normal * radius_b]),
        )
    }

    /// Convex polygon (world-space vertices) against a circle.
    pub fn polygon_circle(
        body_a: BodyId,
        vertices: &[DVec2],
        center_a: DVec2,
        body_b: BodyId,
        center_b: DVec2,
        radius: f64,
    ) -> Option<ContactManifold> {
        let mut axes = Self::edge_axes(vertices);
        if let Some(closest) = Self::closest_vertex(vertices, center_b) {
            let axis = closest - center_b;
            if axis.length_squared() > Self::AXIS_EPSILON {
                axes.push(axis.normalize());
            }
        }

        let (normal, depth) = Self::min_overlap_axis(&axes, |axis| {
            (
                Projection::of_points(vertices, axis),
                Projection::of_circle(center_b, radius, axis),
            )
        })?;
        let normal = Self::orient(normal, center_a, center_b);

        let mut closest = vertices[0];
        let mut best = f64::INFINITY;
        for (i, v) in vertices.iter().enumerate() {
            let next = vertices[(i + 1) % vertices.len()];
            let candidate = closest_point_on_segment(center_b, *v, next);
            let dist_sq = candidate.distance_squared(center_b);
            if dist_sq < best {
                best = dist_sq;
                closest = candidate;
            }
        }

        Some(ContactManifold::new(body_a, body_b, normal, -depth).with_points([closest]))
    }

    /// Convex polygon against convex polygon, with clipped contact points.
    pub fn polygon_polygon(
        body_a: BodyId,
        vertices_a: &[DVec2],
        center_a: DVec2,
        body_b: BodyId,
        vertices_b: &[DVec2],
        center_b: DVec2,
    ) -> Option<ContactManifold> {
        let mut axes = Self::edge_axes(vertices_a);
        axes.extend(Self::edge_axes(vertices_b));

        let (normal, depth) = Self::min_overlap_axis(&axes, |axis| {
            (
                Projection::of_points(vertices_a, axis),
                Projection::of_points(vertices_b, axis),
            )
        })?;
        let normal = Self::orient(normal, center_a, center_b);

        let points = polygon_contact_points(vertices_a, vertices_b, normal)?;
        Some(ContactManifold::new(body_a, body_b, normal, -depth).with_points(points))
    }

    /// Unit outward normals of each polygon edge; degenerate edges are skipped.
    fn edge_axes(vertices: &[DVec2]) -> Vec<DVec2> {
        let n = vertices.len();
        let mut axes = Vec::with_capacity(n + 1);
        for i in 0..n {
            let edge = vertices[i] - vertices[(i + 1) % n];
            let axis = DVec2::new(-edge.y, edge.x);
            if axis.length_squared() > Self::AXIS_EPSILON {
                axes.push(axis.normalize());
            }
        }
        axes
    }

    fn closest_vertex(vertices: &[DVec2], point: DVec2) -> Option<DVec2> {
        vertices
            .iter()
            .copied()
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
    }

    /// Axis with the smallest overlap, or `None` when any axis separates or none is usable.
    fn min_overlap_axis(
        axes: &[DVec2],
        project: impl Fn(DVec2) -> (Projection, Projection),
    ) -> Option<(DVec2, f64)> {
        let mut best: Option<(DVec2, f64)> = None;
        for axis in axes {
            let (p1, p2) = project(*axis);
            let overlap = p1.overlap(&p2)?;
            if best.map_or(true, |(_, current)| overlap < current) {
                best = Some((*axis, overlap));
            }
        }
        best
    }

    /// Flips `normal` so it points from `center_a` toward `center_b`.
    fn orient(normal: DVec2, center_a: DVec2, center_b: DVec2) -> DVec2 {
        let direction = center_a - center_b;
        let normal = if direction.dot(normal) > 0.0 {
            -normal
        } else {
            normal
        };
        normal.normalize_or_self()
    }
}

/// Narrow-phase dispatcher over body shapes.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Full detector: bounding-box reject, canonical ordering, then the exact test.
    ///
    /// Polygon/circle pairs are always reported with the polygon as `body_a`.
    pub fn detect(body_a: &Body, body_b: &Body) -> Option<ContactManifold> {
        if !body_a.aabb().overlaps(&body_b.aabb()) {
            return None;
        }

        let (first, second) = match (body_a.shape(), body_b.shape()) {
            (Shape::Circle(_), Shape::Polygon(_)) => (body_b, body_a),
            _ => (body_a, body_b),
        };

        match (first.shape(), second.shape()) {
            (Shape::Circle(c1), Shape::Circle(c2)) => SatAlgorithm::circle_circle(
                first.id,
                first.position,
                c1.radius,
                second.id,
                second.position,
                c2.radius,
            ),
            (Shape::Polygon(p1), Shape::Circle(c2)) => SatAlgorithm::polygon_circle(
                first.id,
                &p1.world_vertices(first.position),
                first.position,
                second.id,
                second.position,
                c2.radius,
            ),
            (Shape::Polygon(p1), Shape::Polygon(p2)) => SatAlgorithm::polygon_polygon(
                first.id,
                &p1.world_vertices(first.position),
                first.position,
                second.id,
                &p2.world_vertices(second.position),
                second.position,
            ),
            (Shape::Circle(_), Shape::Polygon(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn id(index: usize) -> BodyId {
        BodyId::new(index, 0)
    }

    #[test]
    fn circles_report_negative_overlap_and_rim_points() {
        let manifold = SatAlgorithm::circle_circle(
            id(0),
            DVec2::ZERO,
            10.0,
            id(1),
            DVec2::new(15.0, 0.0),
            10.0,
        )
        .expect("overlapping circles");
        assert_abs_diff_eq!(manifold.overlap, -5.0);
        assert_abs_diff_eq!(manifold.normal.x, 1.0);
        assert_abs_diff_eq!(manifold.normal.y, 0.0);
        assert_eq!(manifold.points, vec![DVec2::new(10.0, 0.0), DVec2::new(5.0, 0.0)]);
    }

    #[test]
    fn touching_circles_do_not_collide() {
        assert!(SatAlgorithm::circle_circle(
            id(0),
            DVec2::ZERO,
            1.0,
            id(1),
            DVec2::new(2.0, 0.0),
            1.0
        )
        .is_none());
    }

    #[test]
    fn concentric_circles_fall_back_to_x_axis() {
        let manifold =
            SatAlgorithm::circle_circle(id(0), DVec2::ZERO, 1.0, id(1), DVec2::ZERO, 2.0)
                .expect("concentric circles overlap");
        assert_eq!(manifold.normal, DVec2::X);
        assert_abs_diff_eq!(manifold.overlap, -3.0);
    }

    #[test]
    fn polygon_circle_normal_points_toward_circle() {
        let square = vec![
            DVec2::new(-10.0, -10.0),
            DVec2::new(10.0, -10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(-10.0, 10.0),
        ];
        let manifold = SatAlgorithm::polygon_circle(
            id(0),
            &square,
            DVec2::ZERO,
            id(1),
            DVec2::new(0.0, 14.0),
            5.0,
        )
        .expect("circle resting in the top face");
        assert_abs_diff_eq!(manifold.normal.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(manifold.overlap, -1.0, epsilon = 1e-12);
        assert_eq!(manifold.points, vec![DVec2::new(0.0, 10.0)]);
    }

    #[test]
    fn separated_polygons_miss() {
        let a = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 2.0),
        ];
        let b: Vec<DVec2> = a.iter().map(|v| *v + DVec2::new(1.6, 1.6)).collect();
        assert!(SatAlgorithm::polygon_polygon(
            id(0),
            &a,
            DVec2::new(2.0 / 3.0, 2.0 / 3.0),
            id(1),
            &b,
            DVec2::new(1.6 + 2.0 / 3.0, 1.6 + 2.0 / 3.0),
        )
        .is_none());
    }
}
