use glam::DVec2;
use log::debug;

use super::triangulation::bowyer_watson;
use crate::{
    core::{
        body::Body,
        factory::{BodyBlueprint, BodyParams},
        shape::{ConvexPolygon, ShapeGeometry},
    },
    utils::math::signed_area,
};

/// Triangular piece of a shattered outline, in the parent's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Counter-clockwise.
    pub vertices: [DVec2; 3],
    pub area: f64,
}

const TILING_TOLERANCE: f64 = 1e-9;

/// Re-triangulates a convex outline into fragments that tile it.
///
/// Co-circular outlines leave the circumcircle test undecided; when the
/// Delaunay pass does not cover the outline exactly, a fan from the first
/// vertex is used instead.
pub fn fragment_outline(polygon: &ConvexPolygon) -> Vec<Fragment> {
    let fragments: Vec<Fragment> = bowyer_watson(polygon.vertices())
        .into_iter()
        .filter_map(|triangle| {
            let area = triangle.area();
            (area > f64::EPSILON).then(|| Fragment {
                vertices: triangle.counter_clockwise(),
                area,
            })
        })
        .collect();

    let expected = polygon.area();
    let covered: f64 = fragments.iter().map(|f| f.area).sum();
    if (covered - expected).abs() <= expected * TILING_TOLERANCE {
        return fragments;
    }

    debug!("delaunay pass covered {covered:.6} of {expected:.6}, using a fan");
    fan(polygon.vertices())
}

fn fan(vertices: &[DVec2]) -> Vec<Fragment> {
    let Some((&apex, rest)) = vertices.split_first() else {
        return Vec::new();
    };
    rest.windows(2)
        .filter_map(|pair| {
            let triangle = [apex, pair[0], pair[1]];
            let area = signed_area(&triangle);
            (area > f64::EPSILON).then_some(Fragment {
                vertices: triangle,
                area,
            })
        })
        .collect()
}

/// Blueprints for the asteroids a polygonal body breaks into.
///
/// Each fragment inherits position, velocity, angle and angular velocity of
/// `body`, and carries `density * area` of its mass. Circles yield nothing.
pub fn shatter_blueprints(body: &Body) -> Vec<BodyBlueprint> {
    let Some(polygon) = body.shape().as_polygon() else {
        return Vec::new();
    };
    let density = body.density();

    fragment_outline(polygon)
        .into_iter()
        .map(|fragment| {
            let params = BodyParams {
                name: None,
                mass: density * fragment.area,
                age: 0,
                ..BodyParams::from_body(body)
            };
            BodyBlueprint::asteroid(fragment.vertices.to_vec(), params)
        })
        .collect()
}
