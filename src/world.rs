//! Simulation orchestrator: owns the body population and runs the tick pipeline.

pub mod contacts;
pub mod merge;
pub mod queries;
pub mod reactions;
pub mod runner;
pub mod spawner;

use std::time::Instant;

use glam::DVec2;
use log::{debug, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    collision::{broadphase::BroadPhase, contact::ContactManifold, narrowphase::NarrowPhase},
    config::{WorldConfig, DEFAULT_ASTEROID_RADIUS, DEFAULT_ASTEROID_SIDES},
    core::{
        body::{Body, BodyError},
        factory::{BodyBlueprint, BodyParams},
        shape::ConvexPolygon,
    },
    dynamics::{
        forces::{ForceGenerator, ForceRegistry, NewtonianGravity},
        integrator::Integrator,
        solver::{CollisionSummary, SequentialImpulseSolver, SolverSettings},
    },
    utils::{
        allocator::{Arena, BodyId},
        logging::{warn_if_tick_budget_exceeded, ScopedTimer, TickPhase},
        profiling::{PhaseTimer, TickProfiler},
    },
};

use self::{
    contacts::ContactTracker,
    merge::merge_blueprint,
    reactions::{reaction_for, ReactionContext, ReactionOutcome},
    spawner::Spawner,
};

/// Presentation collaborator; visited once per live body.
pub trait BodyRenderer {
    fn draw(&mut self, body: &Body);
}

/// Population changes made by one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub contacts: usize,
    pub absorbed: usize,
    pub transformed: usize,
    pub shattered: usize,
    pub merged: usize,
    pub escaped: usize,
    pub spawned: usize,
    pub removed: usize,
}

/// Central simulation container.
///
/// One [`PhysicsWorld::step`] runs detection, resolution, reactions,
/// integration, gravity, merging and cleanup in that order. Bodies created
/// along the way are queued and only join the population at cleanup.
pub struct PhysicsWorld {
    bodies: Arena<Body>,
    config: WorldConfig,
    broadphase: BroadPhase,
    solver: SequentialImpulseSolver,
    integrator: Integrator,
    forces: ForceRegistry,
    contacts: ContactTracker,
    spawner: Spawner,
    profiler: TickProfiler,
    tick: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl PhysicsWorld {
    pub fn new(config: WorldConfig) -> Self {
        let mut forces = ForceRegistry::new();
        forces.add_force(NewtonianGravity::from_config(&config));

        Self {
            bodies: Arena::new(),
            broadphase: BroadPhase::new(),
            solver: SequentialImpulseSolver::new(SolverSettings::from(&config)),
            integrator: Integrator::from_config(&config),
            forces,
            contacts: ContactTracker::new(),
            spawner: Spawner::new(config.rng_seed),
            profiler: TickProfiler::default(),
            tick: 0,
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Timings and counters of the last tick.
    pub fn profiler(&self) -> &TickProfiler {
        &self.profiler
    }

    pub fn set_parallel_detection(&mut self, enabled: bool) {
        self.config.parallel_detection = enabled;
    }

    /// Registers an extra force applied after the built-in gravity.
    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.add_force(force);
    }

    /// Validates `blueprint` and inserts the body immediately.
    pub fn spawn(&mut self, blueprint: BodyBlueprint) -> Result<BodyId, BodyError> {
        let body = self.spawner.build(blueprint, &self.config)?;
        Ok(self.insert(body))
    }

    pub fn add_star(&mut self, radius: f64, params: BodyParams) -> Result<BodyId, BodyError> {
        self.spawn(BodyBlueprint::star(radius, params))
    }

    pub fn add_planet(
        &mut self,
        radius: f64,
        population: u64,
        orbit: Option<String>,
        params: BodyParams,
    ) -> Result<BodyId, BodyError> {
        self.spawn(BodyBlueprint::planet(radius, population, orbit, params))
    }

    pub fn add_moon(
        &mut self,
        radius: f64,
        orbit: Option<String>,
        params: BodyParams,
    ) -> Result<BodyId, BodyError> {
        self.spawn(BodyBlueprint::moon(radius, orbit, params))
    }

    /// `vertices` are relative to `params.position`; the body ends up centred
    /// on their centroid.
    pub fn add_asteroid(
        &mut self,
        vertices: Vec<DVec2>,
        params: BodyParams,
    ) -> Result<BodyId, BodyError> {
        self.spawn(BodyBlueprint::asteroid(vertices, params))
    }

    /// Regular hexagonal asteroid of radius 100.
    pub fn add_default_asteroid(&mut self, params: BodyParams) -> Result<BodyId, BodyError> {
        let outline = ConvexPolygon::regular(DEFAULT_ASTEROID_SIDES, DEFAULT_ASTEROID_RADIUS)?;
        self.add_asteroid(outline.vertices().to_vec(), params)
    }

    fn insert(&mut self, body: Body) -> BodyId {
        let id = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(id) {
            stored.id = id;
        }
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> &Arena<Body> {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Flags a body for removal at the next cleanup.
    pub fn destroy(&mut self, id: BodyId) -> bool {
        match self.bodies.get_mut(id) {
            Some(body) => {
                body.destroy();
                true
            }
            None => false,
        }
    }

    /// Drops every body and all contact history. Name numbering continues.
    pub fn clear(&mut self) {
        self.bodies = Arena::new();
        self.contacts.clear();
        self.spawner.take_pending();
    }

    /// Builds every blueprint first, then swaps them in for the current
    /// population. On error the world is left as it was.
    pub fn replace_bodies(
        &mut self,
        blueprints: impl IntoIterator<Item = BodyBlueprint>,
    ) -> Result<Vec<BodyId>, BodyError> {
        let built = blueprints
            .into_iter()
            .map(|blueprint| self.spawner.build(blueprint, &self.config))
            .collect::<Result<Vec<Body>, BodyError>>()?;

        self.clear();
        Ok(built.into_iter().map(|body| self.insert(body)).collect())
    }

    /// Consecutive ticks the pair has been touching.
    pub fn contact_duration(&self, a: BodyId, b: BodyId) -> u32 {
        self.contacts.duration(a, b)
    }

    /// Bodies waiting for the next cleanup.
    pub fn pending_spawns(&self) -> usize {
        self.spawner.pending_len()
    }

    pub fn render<R: BodyRenderer + ?Sized>(&self, renderer: &mut R) {
        for body in self.bodies.values().filter(|body| !body.is_destroyed()) {
            renderer.draw(body);
        }
    }

    /// Runs detection on the current state without advancing the simulation.
    /// Useful for debugging and tests.
    pub fn collect_contacts(&mut self) -> Vec<ContactManifold> {
        self.detect_contacts()
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> TickReport {
        let _tick_timer = ScopedTimer::tick(self.tick);
        let started = Instant::now();
        let mut profiler = TickProfiler::default();
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        let manifolds = {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::Detect);
            let _phase = PhaseTimer::new(&mut profiler.detect_time);
            let manifolds = self.detect_contacts();
            self.contacts
                .record_tick(manifolds.iter().map(|m| (m.body_a, m.body_b)));
            manifolds
        };
        report.contacts = manifolds.len();

        let constraints = {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::Solve);
            let _phase = PhaseTimer::new(&mut profiler.solve_time);
            let mut constraints = self.solver.prepare(&self.bodies, &manifolds);
            self.solver.solve(&mut self.bodies, &mut constraints);
            constraints
        };

        {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::React);
            let _phase = PhaseTimer::new(&mut profiler.react_time);
            for constraint in &constraints {
                let (a, b) = (constraint.body_a, constraint.body_b);
                if !self.both_alive(a, b) {
                    continue;
                }
                let summary = constraint.summary();
                for (this, other) in [(a, b), (b, a)] {
                    match self.react(this, other, &summary) {
                        ReactionOutcome::Unchanged => {}
                        ReactionOutcome::Absorbed { .. } => report.absorbed += 1,
                        ReactionOutcome::Transformed { .. } => report.transformed += 1,
                        ReactionOutcome::Shattered { .. } => report.shattered += 1,
                    }
                }
            }
        }

        {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::Integrate);
            let _phase = PhaseTimer::new(&mut profiler.integrate_time);
            report.escaped = self.integrator.step(&mut self.bodies);
        }

        {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::Gravity);
            let _phase = PhaseTimer::new(&mut profiler.gravity_time);
            self.forces.apply_all(&mut self.bodies);
        }

        {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::Merge);
            let _phase = PhaseTimer::new(&mut profiler.merge_time);
            report.merged = self.merge_long_contacts();
        }

        {
            let _timer = ScopedTimer::phase(self.tick, TickPhase::Cleanup);
            let _phase = PhaseTimer::new(&mut profiler.cleanup_time);
            let (removed, spawned) = self.cleanup();
            report.removed = removed;
            report.spawned = spawned;
        }

        self.tick += 1;
        profiler.total_tick_time = started.elapsed();
        profiler.body_count = self.bodies.len();
        profiler.contact_count = report.contacts;
        profiler.spawned_count = report.spawned;
        profiler.removed_count = report.removed;
        self.profiler = profiler;
        warn_if_tick_budget_exceeded(
            report.tick,
            profiler.total_tick_time,
            self.config.tick_budget_ms,
        );

        report
    }

    fn detect_contacts(&mut self) -> Vec<ContactManifold> {
        self.broadphase.update(&self.bodies);
        let pairs = self.broadphase.overlapping_pairs();
        let bodies = &self.bodies;
        let detect = |&(a, b): &(BodyId, BodyId)| NarrowPhase::detect(bodies.get(a)?, bodies.get(b)?);

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel_detection {
                return pairs.par_iter().filter_map(detect).collect();
            }
        }

        pairs.iter().filter_map(detect).collect()
    }

    fn both_alive(&self, a: BodyId, b: BodyId) -> bool {
        let alive = |id| self.bodies.get(id).is_some_and(|body| !body.is_destroyed());
        alive(a) && alive(b)
    }

    /// Runs the hook of `this`. The pair is gated once before both hooks;
    /// each reaction decides what to do when its partner went first.
    fn react(&mut self, this: BodyId, other: BodyId, summary: &CollisionSummary) -> ReactionOutcome {
        let Some(reaction) = self.bodies.get(this).map(|body| reaction_for(&body.kind)) else {
            return ReactionOutcome::Unchanged;
        };

        let mut ctx = ReactionContext {
            bodies: &mut self.bodies,
            spawner: &mut self.spawner,
            config: &self.config,
        };
        reaction.react(&mut ctx, this, other, summary)
    }

    fn merge_long_contacts(&mut self) -> usize {
        let mut merged = 0;
        for pair in self.contacts.exceeding(self.config.merge_duration) {
            let (a, b) = (pair.first(), pair.second());
            let (blueprint, names) = match (self.bodies.get(a), self.bodies.get(b)) {
                (Some(body_a), Some(body_b))
                    if !body_a.is_destroyed() && !body_b.is_destroyed() =>
                {
                    (
                        merge_blueprint(body_a, body_b, self.config.merge_radius_factor),
                        (body_a.name.clone(), body_b.name.clone()),
                    )
                }
                _ => continue,
            };

            if let Err(err) = self.spawner.enqueue(blueprint, &self.config) {
                warn!("merge of {} and {} rejected: {err}", names.0, names.1);
                continue;
            }
            for id in [a, b] {
                if let Some(body) = self.bodies.get_mut(id) {
                    body.destroy();
                }
            }
            self.contacts.forget(a, b);
            debug!("merged {} and {}", names.0, names.1);
            merged += 1;
        }
        merged
    }

    /// Removes destroyed bodies and admits queued ones. Returns (removed, spawned).
    fn cleanup(&mut self) -> (usize, usize) {
        let removed = self.bodies.drain_where(Body::is_destroyed);
        for (_, body) in &removed {
            trace!("removed {}", body.name);
        }

        let bodies = &self.bodies;
        self.contacts.prune(|id| bodies.contains(id));

        let pending = self.spawner.take_pending();
        let spawned = pending.len();
        for body in pending {
            self.insert(body);
        }
        (removed.len(), spawned)
    }
}
