use glam::DVec2;

use crate::{
    config::WorldConfig,
    core::body::Body,
    utils::allocator::{Arena, BodyId},
};

/// Something that exchanges impulses between bodies once per tick.
pub trait ForceGenerator: Send + Sync {
    fn apply(&self, bodies: &mut Arena<Body>);
}

/// Pairwise Newtonian attraction between point masses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub constant: f64,
    /// Lower bound on squared separation.
    pub distance_floor: f64,
}

impl NewtonianGravity {
    pub fn new(constant: f64, distance_floor: f64) -> Self {
        Self {
            constant,
            distance_floor,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.gravity_constant, config.gravity_distance_floor)
    }

    /// Impulse pulling `a` toward `b`; `b` receives the negation.
    pub fn impulse_between(&self, a: &Body, b: &Body) -> DVec2 {
        let separation = b.position - a.position;
        let distance_sq = separation.length_squared().max(self.distance_floor);
        let magnitude = self.constant * a.mass() * b.mass() / distance_sq;
        separation.normalize_or_zero() * magnitude
    }
}

impl ForceGenerator for NewtonianGravity {
    fn apply(&self, bodies: &mut Arena<Body>) {
        if self.constant == 0.0 {
            return;
        }
        let ids: Vec<BodyId> = bodies
            .iter()
            .filter(|(_, body)| !body.is_destroyed())
            .map(|(id, _)| id)
            .collect();

        for (i, &id_a) in ids.iter().enumerate() {
            for &id_b in &ids[i + 1..] {
                if let Some((a, b)) = bodies.get2_mut(id_a, id_b) {
                    let impulse = self.impulse_between(a, b);
                    a.apply_impulse(impulse, DVec2::ZERO);
                    b.apply_impulse(-impulse, DVec2::ZERO);
                }
            }
        }
    }
}

/// Collection of generators applied in registration order.
#[derive(Default)]
pub struct ForceRegistry {
    forces: Vec<Box<dyn ForceGenerator>>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.push(Box::new(force));
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn apply_all(&self, bodies: &mut Arena<Body>) {
        for force in &self.forces {
            force.apply(bodies);
        }
    }
}
