use glam::DVec2;
use log::warn;

use crate::{config::WorldConfig, core::body::Body, utils::allocator::Arena};

/// What happened to a body during one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationOutcome {
    Moved,
    Skipped,
    /// The body left the world and was flagged destroyed.
    OutOfBounds,
}

/// Explicit per-tick integrator with a square world boundary.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub boundary: f64,
}

impl Integrator {
    pub fn new(boundary: f64) -> Self {
        Self { boundary }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.world_boundary)
    }

    /// Advances position and orientation by one tick.
    ///
    /// Static bodies have their velocities zeroed instead. A non-finite
    /// velocity component is ignored for the step and reset to zero.
    pub fn integrate(&self, body: &mut Body) -> IntegrationOutcome {
        if body.is_destroyed() {
            return IntegrationOutcome::Skipped;
        }

        if body.is_static() {
            body.velocity = DVec2::ZERO;
            body.angular_velocity = 0.0;
        } else {
            if body.velocity.is_finite() {
                body.position += body.velocity;
            } else {
                warn!("{}: non-finite velocity {:?} discarded", body.name, body.velocity);
                body.velocity = DVec2::ZERO;
            }

            if body.angular_velocity.is_finite() {
                body.rotate(body.angular_velocity);
            } else {
                warn!(
                    "{}: non-finite angular velocity {} discarded",
                    body.name, body.angular_velocity
                );
                body.angular_velocity = 0.0;
            }
        }

        body.age += 1;

        if self.out_of_bounds(body.position) {
            body.destroy();
            return IntegrationOutcome::OutOfBounds;
        }
        IntegrationOutcome::Moved
    }

    fn out_of_bounds(&self, position: DVec2) -> bool {
        position.x.abs() > self.boundary || position.y.abs() > self.boundary
    }

    /// Integrates every live body; returns how many left the world.
    pub fn step(&self, bodies: &mut Arena<Body>) -> usize {
        let mut escaped = 0;
        for body in bodies.values_mut() {
            if self.integrate(body) == IntegrationOutcome::OutOfBounds {
                log::debug!("{} left the world at {:?}", body.name, body.position);
                escaped += 1;
            }
        }
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factory::{BodyBlueprint, BodyParams, NameGenerator};
    use approx::assert_relative_eq;

    fn planet(params: BodyParams) -> Body {
        BodyBlueprint::planet(5.0, 0, None, params)
            .build(&mut NameGenerator::new(), &WorldConfig::default())
            .expect("valid planet")
    }

    #[test]
    fn moves_and_spins() {
        let mut body = planet(
            BodyParams::at(DVec2::new(1.0, 1.0))
                .velocity(DVec2::new(2.0, -1.0))
                .angular_velocity(std::f64::consts::PI),
        );
        let integrator = Integrator::new(10_000.0);
        assert_eq!(integrator.integrate(&mut body), IntegrationOutcome::Moved);
        assert_eq!(body.position, DVec2::new(3.0, 0.0));
        assert_relative_eq!(body.angle(), 180.0, epsilon = 1e-9);
        assert_eq!(body.age, 1);
    }

    #[test]
    fn nan_velocity_does_not_corrupt_position() {
        let mut body = planet(BodyParams::at(DVec2::new(1.0, 1.0)));
        body.velocity = DVec2::new(f64::NAN, 1.0);
        body.angular_velocity = f64::INFINITY;
        Integrator::new(10_000.0).integrate(&mut body);
        assert_eq!(body.position, DVec2::new(1.0, 1.0));
        assert_eq!(body.velocity, DVec2::ZERO);
        assert_eq!(body.angle(), 0.0);
    }

    #[test]
    fn leaving_the_world_destroys() {
        let mut body = planet(BodyParams::at(DVec2::new(99.5, 0.0)).velocity(DVec2::new(1.0, 0.0)));
        let integrator = Integrator::new(100.0);
        assert_eq!(integrator.integrate(&mut body), IntegrationOutcome::OutOfBounds);
        assert!(body.is_destroyed());
        assert_eq!(integrator.integrate(&mut body), IntegrationOutcome::Skipped);
    }

    #[test]
    fn static_bodies_stay_put() {
        let mut body = planet(BodyParams::at(DVec2::ZERO).fixed());
        body.velocity = DVec2::new(4.0, 4.0);
        Integrator::new(100.0).integrate(&mut body);
        assert_eq!(body.position, DVec2::ZERO);
        assert_eq!(body.velocity, DVec2::ZERO);
    }
}
