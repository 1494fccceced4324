use glam::DVec2;

use crate::utils::math::{polygon_centroid, Vec2Ext};

/// Polygon feature used for clipping: the vertex farthest along a direction and
/// the adjacent edge most perpendicular to that direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub max: DVec2,
    pub start: DVec2,
    pub end: DVec2,
}

impl Edge {
    pub fn vector(&self) -> DVec2 {
        self.end - self.start
    }
}

/// Finds the clipping feature of a convex polygon (world-space vertices) along `normal`.
pub fn significant_edge(vertices: &[DVec2], normal: DVec2) -> Edge {
    let n = vertices.len();
    let mut index = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, v) in vertices.iter().enumerate() {
        let projection = normal.dot(*v);
        if projection > best {
            best = projection;
            index = i;
        }
    }

    let v = vertices[index];
    let next = vertices[(index + 1) % n];
    let prev = vertices[(index + n - 1) % n];

    let left = (v - next).normalize_or_self();
    let right = (v - prev).normalize_or_self();

    if right.dot(normal) <= left.dot(normal) {
        Edge {
            max: v,
            start: prev,
            end: v,
        }
    } else {
        Edge {
            max: v,
            start: v,
            end: next,
        }
    }
}

/// Keeps the part of segment `v1`-`v2` where `direction · p >= offset`.
///
/// Returns at most two points; the crossing point is appended when the
/// segment straddles the boundary.
pub fn clip_segment(v1: DVec2, v2: DVec2, direction: DVec2, offset: f64) -> Vec<DVec2> {
    let mut clipped = Vec::with_capacity(2);
    let d1 = direction.dot(v1) - offset;
    let d2 = direction.dot(v2) - offset;

    if d1 >= 0.0 {
        clipped.push(v1);
    }
    if d2 >= 0.0 {
        clipped.push(v2);
    }
    if d1 * d2 < 0.0 {
        let t = d1 / (d1 - d2);
        clipped.push(v1 + (v2 - v1) * t);
    }
    clipped
}

/// Contact points between two overlapping convex polygons.
///
/// `normal` must point from polygon `a` toward polygon `b`. Returns `None` when
/// clipping degenerates, which callers treat as "not colliding".
pub fn polygon_contact_points(
    vertices_a: &[DVec2],
    vertices_b: &[DVec2],
    normal: DVec2,
) -> Option<Vec<DVec2>> {
    if vertices_a.len() < 3 || vertices_b.len() < 3 {
        return None;
    }

    let edge_a = significant_edge(vertices_a, normal);
    let edge_b = significant_edge(vertices_b, -normal);

    let (reference, incident, reference_polygon) =
        if edge_a.vector().dot(normal).abs() <= edge_b.vector().dot(normal).abs() {
            (edge_a, edge_b, vertices_a)
        } else {
            (edge_b, edge_a, vertices_b)
        };

    let direction = reference.vector().normalize_or_self();
    if direction.length_squared() <= f64::EPSILON {
        return None;
    }

    let lower = direction.dot(reference.start);
    let clipped = clip_segment(incident.start, incident.end, direction, lower);
    if clipped.len() < 2 {
        return None;
    }

    let upper = direction.dot(reference.end);
    let clipped = clip_segment(clipped[0], clipped[1], -direction, -upper);
    if clipped.len() < 2 {
        return None;
    }

    // face normal pointing into the reference polygon
    let mut face_normal = direction.perp();
    if face_normal.dot(polygon_centroid(reference_polygon) - reference.max) < 0.0 {
        face_normal = -face_normal;
    }
    let face = face_normal.dot(reference.max);

    let points: Vec<DVec2> = clipped
        .into_iter()
        .filter(|p| face_normal.dot(*p) - face >= 0.0)
        .collect();

    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}
