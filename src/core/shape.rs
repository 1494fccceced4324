use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{body::BodyError, types::Aabb};
use crate::utils::math::{polygon_centroid, signed_area, Vec2Ext};

/// Geometry every body outline provides to the mass model and the broad phase.
pub trait ShapeGeometry {
    fn area(&self) -> f64;

    /// Moment of inertia about the centroid for the given mass.
    fn moment_of_inertia(&self, mass: f64) -> f64;

    /// World-space bounds when the centroid sits at `position`.
    fn bounds(&self, position: DVec2) -> Aabb;

    /// Spins the outline in place by `radians`.
    fn rotate(&mut self, radians: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self, BodyError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(BodyError::InvalidRadius(radius));
        }
        Ok(Self { radius })
    }
}

impl ShapeGeometry for Circle {
    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn moment_of_inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius
    }

    fn bounds(&self, position: DVec2) -> Aabb {
        Aabb::new(position - self.radius, position + self.radius)
    }

    fn rotate(&mut self, _radians: f64) {}
}

/// Convex outline stored as counter-clockwise offsets from its centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    vertices: Vec<DVec2>,
}

impl ConvexPolygon {
    /// Re-centres `points` on their centroid and fixes the winding.
    ///
    /// Returns the outline together with the centroid that was subtracted, so
    /// callers can shift the body position by the same amount.
    pub fn from_points(points: Vec<DVec2>) -> Result<(Self, DVec2), BodyError> {
        if points.len() < 3 {
            return Err(BodyError::TooFewVertices(points.len()));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(BodyError::NonFinite("polygon vertex"));
        }
        let area = signed_area(&points);
        if area.abs() <= f64::EPSILON {
            return Err(BodyError::DegeneratePolygon);
        }

        let centroid = polygon_centroid(&points);
        let mut vertices: Vec<DVec2> = points.into_iter().map(|p| p - centroid).collect();
        if area < 0.0 {
            vertices.reverse();
        }
        if !turns_left_once(&vertices) {
            return Err(BodyError::NonConvex);
        }
        Ok((Self { vertices }, centroid))
    }

    /// Regular polygon inscribed in a circle of `radius`, first vertex on +x.
    pub fn regular(sides: usize, radius: f64) -> Result<Self, BodyError> {
        if sides < 3 {
            return Err(BodyError::TooFewVertices(sides));
        }
        Circle::new(radius)?;
        let step = TAU / sides as f64;
        let vertices = (0..sides)
            .map(|i| DVec2::from_angle(step * i as f64) * radius)
            .collect();
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices translated to world space.
    pub fn world_vertices(&self, position: DVec2) -> Vec<DVec2> {
        self.vertices.iter().map(|v| *v + position).collect()
    }

    /// Largest centroid-to-vertex distance.
    pub fn bounding_radius(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0, f64::max)
    }
}

impl ShapeGeometry for ConvexPolygon {
    fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    fn moment_of_inertia(&self, mass: f64) -> f64 {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let cross = a.cross(b).abs();
            numerator += cross * (a.dot(a) + a.dot(b) + b.dot(b));
            denominator += cross;
        }
        if denominator <= f64::EPSILON {
            return 0.0;
        }
        mass * numerator / (6.0 * denominator)
    }

    fn bounds(&self, position: DVec2) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| *v + position))
    }

    fn rotate(&mut self, radians: f64) {
        let rotation = DVec2::from_angle(radians);
        for v in &mut self.vertices {
            *v = rotation.rotate(*v);
        }
    }
}

/// Closed set of body outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Polygon(ConvexPolygon),
}

impl Shape {
    pub fn circle(radius: f64) -> Result<Self, BodyError> {
        Circle::new(radius).map(Shape::Circle)
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(circle) => Some(circle),
            Shape::Polygon(_) => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&ConvexPolygon> {
        match self {
            Shape::Polygon(polygon) => Some(polygon),
            Shape::Circle(_) => None,
        }
    }

    /// Circle radius, or the bounding radius of a polygon.
    pub fn radius(&self) -> f64 {
        match self {
            Shape::Circle(circle) => circle.radius,
            Shape::Polygon(polygon) => polygon.bounding_radius(),
        }
    }
}

impl ShapeGeometry for Shape {
    fn area(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.area(),
            Shape::Polygon(p) => p.area(),
        }
    }

    fn moment_of_inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Circle(c) => c.moment_of_inertia(mass),
            Shape::Polygon(p) => p.moment_of_inertia(mass),
        }
    }

    fn bounds(&self, position: DVec2) -> Aabb {
        match self {
            Shape::Circle(c) => c.bounds(position),
            Shape::Polygon(p) => p.bounds(position),
        }
    }

    fn rotate(&mut self, radians: f64) {
        match self {
            Shape::Circle(c) => c.rotate(radians),
            Shape::Polygon(p) => p.rotate(radians),
        }
    }
}

/// True when a counter-clockwise outline never turns right and winds exactly once.
/// Collinear and repeated vertices are tolerated.
fn turns_left_once(vertices: &[DVec2]) -> bool {
    let n = vertices.len();
    let edges: Vec<DVec2> = (0..n)
        .map(|i| vertices[(i + 1) % n] - vertices[i])
        .filter(|edge| edge.length_squared() > f64::EPSILON)
        .collect();

    let mut turning = 0.0;
    for (i, edge) in edges.iter().enumerate() {
        let next = edges[(i + 1) % edges.len()];
        let cross = edge.cross(next);
        if cross < -CONVEXITY_TOLERANCE * edge.length() * next.length() {
            return false;
        }
        turning += cross.atan2(edge.dot(next));
    }
    (turning - TAU).abs() < 1e-6
}

const CONVEXITY_TOLERANCE: f64 = 1e-9;
