use std::f64::consts::PI;

use crate::core::{
    body::Body,
    factory::{BodyBlueprint, BodyParams},
};

/// Blueprint for the planet that replaces two long-touching bodies.
///
/// Mass is the exact sum. The centre sits on the segment between the inputs,
/// pulled toward the heavier one. Radius comes from the combined area scaled
/// by `radius_factor`. Velocity and spin are taken whole from the heavier
/// input; on a tie `a` wins.
pub fn merge_blueprint(a: &Body, b: &Body, radius_factor: f64) -> BodyBlueprint {
    let mass = a.mass() + b.mass();
    let ratio = if mass > 0.0 { b.mass() / mass } else { 0.5 };
    let position = a.position + (b.position - a.position) * ratio;
    let radius = ((a.area() + b.area()) / PI).sqrt() * radius_factor;
    let dominant = if ratio > 0.5 { b } else { a };

    BodyBlueprint::planet(
        radius,
        0,
        None,
        BodyParams::at(position)
            .mass(mass)
            .velocity(dominant.velocity)
            .angular_velocity(dominant.angular_velocity),
    )
}
