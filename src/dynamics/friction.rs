use glam::DVec2;

use super::solver::{relative_velocity, ContactPoint};
use crate::{core::body::Body, utils::math::Vec2Ext};

/// Tangential impulse for one contact point, clamped to the Coulomb cone.
///
/// The accumulated tangent impulse never exceeds `friction` times the point's
/// accumulated normal impulse in magnitude.
pub fn apply_coulomb_friction(
    body_a: &mut Body,
    body_b: &mut Body,
    point: &mut ContactPoint,
    normal: DVec2,
    friction: f64,
) {
    let tangent = normal.cross_scalar(1.0);
    let dv = relative_velocity(body_a, body_b, point.r_a, point.r_b);
    let vt = dv.dot(tangent);

    let dpt = point.mass_tangent * -vt;
    let max_friction = (friction * point.normal_impulse).max(0.0);

    let previous = point.tangent_impulse;
    point.tangent_impulse = (previous + dpt).clamp(-max_friction, max_friction);
    let dpt = point.tangent_impulse - previous;

    let impulse = tangent * dpt;
    body_a.apply_impulse(-impulse, point.r_a);
    body_b.apply_impulse(impulse, point.r_b);
}
