use glam::DVec2;

use super::friction::apply_coulomb_friction;
use crate::{
    collision::contact::ContactManifold,
    config::WorldConfig,
    core::body::Body,
    utils::{
        allocator::{Arena, BodyId},
        math::{scalar_cross, Vec2Ext},
    },
};

/// Knobs of the sequential-impulse solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub iterations: u32,
    pub bias_factor: f64,
    pub allowed_penetration: f64,
    /// Closing speeds below this (negative) value bounce.
    pub bounce_threshold: f64,
}

impl From<&WorldConfig> for SolverSettings {
    fn from(config: &WorldConfig) -> Self {
        Self {
            iterations: config.solver_iterations,
            bias_factor: config.bias_factor,
            allowed_penetration: config.allowed_penetration,
            bounce_threshold: config.bounce_threshold,
        }
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::from(&WorldConfig::default())
    }
}

/// Per contact point state, precomputed once and accumulated over iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub position: DVec2,
    pub r_a: DVec2,
    pub r_b: DVec2,
    pub mass_normal: f64,
    pub mass_tangent: f64,
    pub bias: f64,
    pub restitution_bias: f64,
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
}

/// What the reaction hooks get to see about a resolved collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSummary {
    /// Largest single normal impulse increment computed this tick.
    pub peak_normal_impulse: f64,
    /// Sum of the accumulated normal impulses over all points.
    pub total_normal_impulse: f64,
    pub normal: DVec2,
}

/// Velocity constraint for one colliding pair.
#[derive(Debug, Clone)]
pub struct ContactConstraint {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub normal: DVec2,
    pub overlap: f64,
    pub friction: f64,
    pub points: Vec<ContactPoint>,
    pub peak_normal_impulse: f64,
}

impl ContactConstraint {
    /// Precomputes effective masses and bias terms from the pre-resolution state.
    pub fn new(
        manifold: &ContactManifold,
        body_a: &Body,
        body_b: &Body,
        settings: &SolverSettings,
    ) -> Self {
        let normal = manifold.normal;
        let tangent = normal.cross_scalar(1.0);
        let friction = body_a.material.combined_friction(&body_b.material);
        let elasticity = body_a.material.combined_elasticity(&body_b.material);
        let bias = settings.bias_factor
            * (-manifold.overlap - settings.allowed_penetration).max(0.0);

        let inv_mass_sum = body_a.inverse_mass() + body_b.inverse_mass();
        let inv_inertia_a = body_a.inverse_inertia();
        let inv_inertia_b = body_b.inverse_inertia();

        let points = manifold
            .points
            .iter()
            .map(|&position| {
                let r_a = position - body_a.position;
                let r_b = position - body_b.position;

                let rn_a = r_a.dot(normal);
                let rn_b = r_b.dot(normal);
                let k_normal = inv_mass_sum
                    + (r_a.dot(r_a) - rn_a * rn_a) * inv_inertia_a
                    + (r_b.dot(r_b) - rn_b * rn_b) * inv_inertia_b;

                let rt_a = r_a.dot(tangent);
                let rt_b = r_b.dot(tangent);
                let k_tangent = inv_mass_sum
                    + (r_a.dot(r_a) - rt_a * rt_a) * inv_inertia_a
                    + (r_b.dot(r_b) - rt_b * rt_b) * inv_inertia_b;

                let closing = relative_velocity(body_a, body_b, r_a, r_b).dot(normal);
                let restitution_bias = if closing < settings.bounce_threshold {
                    -elasticity * closing
                } else {
                    0.0
                };

                ContactPoint {
                    position,
                    r_a,
                    r_b,
                    mass_normal: effective_mass(k_normal),
                    mass_tangent: effective_mass(k_tangent),
                    bias,
                    restitution_bias,
                    normal_impulse: 0.0,
                    tangent_impulse: 0.0,
                }
            })
            .collect();

        Self {
            body_a: manifold.body_a,
            body_b: manifold.body_b,
            normal,
            overlap: manifold.overlap,
            friction,
            points,
            peak_normal_impulse: 0.0,
        }
    }

    /// One Gauss-Seidel pass over this pair's contact points.
    pub fn solve_velocity(&mut self, body_a: &mut Body, body_b: &mut Body) {
        if body_a.is_static() && body_b.is_static() {
            return;
        }

        let normal = self.normal;
        for point in &mut self.points {
            let dv = relative_velocity(body_a, body_b, point.r_a, point.r_b);
            let vn = dv.dot(normal);

            let mut dpn = point.mass_normal * (-vn + point.bias + point.restitution_bias);
            self.peak_normal_impulse = self.peak_normal_impulse.max(dpn);

            let previous = point.normal_impulse;
            point.normal_impulse = (previous + dpn).max(0.0);
            dpn = point.normal_impulse - previous;

            let impulse = normal * dpn;
            body_a.apply_impulse(-impulse, point.r_a);
            body_b.apply_impulse(impulse, point.r_b);

            apply_coulomb_friction(body_a, body_b, point, normal, self.friction);
        }
    }

    pub fn summary(&self) -> CollisionSummary {
        CollisionSummary {
            peak_normal_impulse: self.peak_normal_impulse,
            total_normal_impulse: self.points.iter().map(|p| p.normal_impulse).sum(),
            normal: self.normal,
        }
    }
}

/// Velocity of `body_b` relative to `body_a` at the shared contact point.
pub fn relative_velocity(body_a: &Body, body_b: &Body, r_a: DVec2, r_b: DVec2) -> DVec2 {
    (body_b.velocity + scalar_cross(body_b.angular_velocity, r_b))
        - (body_a.velocity + scalar_cross(body_a.angular_velocity, r_a))
}

fn effective_mass(k: f64) -> f64 {
    if k > f64::EPSILON {
        1.0 / k
    } else {
        0.0
    }
}

/// Iterative sequential-impulse contact solver with Baumgarte stabilisation.
#[derive(Debug, Clone, Default)]
pub struct SequentialImpulseSolver {
    pub settings: SolverSettings,
}

impl SequentialImpulseSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Builds constraints for every manifold whose bodies are still present.
    pub fn prepare(
        &self,
        bodies: &Arena<Body>,
        manifolds: &[ContactManifold],
    ) -> Vec<ContactConstraint> {
        manifolds
            .iter()
            .filter_map(|manifold| {
                let body_a = bodies.get(manifold.body_a)?;
                let body_b = bodies.get(manifold.body_b)?;
                Some(ContactConstraint::new(
                    manifold,
                    body_a,
                    body_b,
                    &self.settings,
                ))
            })
            .collect()
    }

    pub fn solve(&self, bodies: &mut Arena<Body>, constraints: &mut [ContactConstraint]) {
        for _ in 0..self.settings.iterations {
            for constraint in constraints.iter_mut() {
                if let Some((body_a, body_b)) =
                    bodies.get2_mut(constraint.body_a, constraint.body_b)
                {
                    constraint.solve_velocity(body_a, body_b);
                }
            }
        }
    }
}
