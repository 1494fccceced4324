//! Celestial Impulse – 2D gravity and collision engine for Rust.
//!
//! Circles and convex polygons attract each other, collide through a
//! sequential-impulse solver, merge after prolonged contact and shatter
//! into Delaunay fragments when struck hard enough.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod fracture;
pub mod persistence;
pub mod utils;
pub mod world;

use std::{path::Path, time::Duration};

pub use glam::DVec2;

pub use collision::{
    broadphase::BroadPhase,
    contact::ContactManifold,
    narrowphase::{NarrowPhase, SatAlgorithm},
};
pub use config::WorldConfig;
pub use crate::core::{
    body::{Body, BodyError, BodyKind},
    factory::{BodyBlueprint, BodyParams, NameGenerator, ShapeSpec},
    shape::{Circle, ConvexPolygon, Shape, ShapeGeometry},
    types::{Aabb, MassProperties, Material},
};
pub use dynamics::{
    forces::{ForceGenerator, ForceRegistry, NewtonianGravity},
    integrator::Integrator,
    solver::{CollisionSummary, SequentialImpulseSolver, SolverSettings},
};
pub use persistence::{parse_records, write_records, BodyRecord, PersistenceError, RecordDocument};
pub use utils::allocator::{Arena, BodyId, GenerationalId};
pub use utils::{logging::TickPhase, profiling::TickProfiler};
pub use world::{
    queries::PlanetRoute, runner::SimulationRunner, BodyRenderer, PhysicsWorld, TickReport,
};

/// High-level convenience wrapper that owns a [`PhysicsWorld`].
pub struct SimulationEngine {
    world: PhysicsWorld,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl SimulationEngine {
    /// Creates an engine with the provided configuration.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            world: PhysicsWorld::new(config),
        }
    }

    /// Spawns any body kind from a blueprint and returns its [`BodyId`].
    pub fn spawn(&mut self, blueprint: BodyBlueprint) -> Result<BodyId, BodyError> {
        self.world.spawn(blueprint)
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> TickReport {
        self.world.step()
    }

    /// Advances the simulation by `ticks` ticks and returns the last report.
    pub fn run(&mut self, ticks: u64) -> Option<TickReport> {
        (0..ticks).map(|_| self.world.step()).last()
    }

    /// Immutable access to a body by id.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.world.body(id)
    }

    /// Mutable access to a body by id.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.world.body_mut(id)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Hands the world to a background thread ticking every `interval`.
    pub fn into_runner(self, interval: Duration) -> SimulationRunner {
        SimulationRunner::start(self.world, interval)
    }

    /// Replaces the population with the contents of a record file.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, PersistenceError> {
        self.world.load_file(path)
    }

    /// Saves the live population to a record file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        self.world.save_file(path)
    }
}
