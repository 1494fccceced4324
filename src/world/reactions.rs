//! Per-kind collision reactions, run after the solver for every resolved pair.

use log::{debug, warn};

use super::spawner::Spawner;
use crate::{
    config::WorldConfig,
    core::{
        body::{Body, BodyKind},
        factory::{BodyBlueprint, BodyParams},
    },
    dynamics::solver::CollisionSummary,
    fracture::{generator::random_outline, shatter::shatter_blueprints},
    utils::allocator::{Arena, BodyId},
};

/// What a reaction did to the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    Unchanged,
    Absorbed { survivor: BodyId, consumed: BodyId },
    Transformed { planet: BodyId },
    Shattered { asteroid: BodyId, fragments: usize },
}

/// Mutable view of the world handed to reactions.
pub struct ReactionContext<'a> {
    pub bodies: &'a mut Arena<Body>,
    pub spawner: &'a mut Spawner,
    pub config: &'a WorldConfig,
}

/// Both hooks of a pair run once the pair has passed the liveness check, so
/// `other` may already have been destroyed by its own hook.
pub trait CollisionReaction: Send + Sync {
    /// Reacts on behalf of `this` to a resolved contact with `other`.
    fn react(
        &self,
        ctx: &mut ReactionContext<'_>,
        this: BodyId,
        other: BodyId,
        summary: &CollisionSummary,
    ) -> ReactionOutcome;
}

/// Stars swallow whatever they touch unless a heavier star gets them first.
pub struct StarAbsorption;

/// Planets hit hard enough crumble into an asteroid.
pub struct PlanetBreakup;

/// Asteroids hit hard enough shatter into triangular fragments.
pub struct AsteroidShatter;

/// Moons only bounce.
pub struct Inert;

pub fn reaction_for(kind: &BodyKind) -> &'static dyn CollisionReaction {
    match kind {
        BodyKind::Star => &StarAbsorption,
        BodyKind::Planet { .. } => &PlanetBreakup,
        BodyKind::Moon { .. } => &Inert,
        BodyKind::Asteroid => &AsteroidShatter,
    }
}

fn impulse_per_density(body: &Body, summary: &CollisionSummary) -> f64 {
    let density = body.density();
    if density > 0.0 {
        summary.peak_normal_impulse / density
    } else {
        0.0
    }
}

impl CollisionReaction for StarAbsorption {
    fn react(
        &self,
        ctx: &mut ReactionContext<'_>,
        this: BodyId,
        other: BodyId,
        _summary: &CollisionSummary,
    ) -> ReactionOutcome {
        let Some((star, target)) = ctx.bodies.get2_mut(this, other) else {
            return ReactionOutcome::Unchanged;
        };
        // the partner's hook already settled a star pair
        if star.is_destroyed() || target.is_destroyed() {
            return ReactionOutcome::Unchanged;
        }

        let (survivor, consumed) =
            if matches!(target.kind, BodyKind::Star) && star.mass() < target.mass() {
                (target, star)
            } else {
                (star, target)
            };

        survivor.set_mass(survivor.mass() + consumed.mass());
        consumed.destroy();
        debug!(
            "{} absorbed {} (mass now {:.3})",
            survivor.name,
            consumed.name,
            survivor.mass()
        );

        ReactionOutcome::Absorbed {
            survivor: survivor.id,
            consumed: consumed.id,
        }
    }
}

impl CollisionReaction for PlanetBreakup {
    fn react(
        &self,
        ctx: &mut ReactionContext<'_>,
        this: BodyId,
        _other: BodyId,
        summary: &CollisionSummary,
    ) -> ReactionOutcome {
        let Some(planet) = ctx.bodies.get(this).filter(|body| !body.is_destroyed()) else {
            return ReactionOutcome::Unchanged;
        };
        if impulse_per_density(planet, summary) <= ctx.config.planet_break_impulse {
            return ReactionOutcome::Unchanged;
        }

        let outline = random_outline(
            ctx.spawner.rng(),
            planet.radius(),
            ctx.config.random_vertex_range,
            ctx.config.random_angle_variation,
        );
        let params = BodyParams {
            name: None,
            ..BodyParams::from_body(planet)
        };
        let name = planet.name.clone();

        if let Err(err) = ctx
            .spawner
            .enqueue(BodyBlueprint::asteroid(outline, params), ctx.config)
        {
            warn!("{name} could not turn into an asteroid: {err}");
            return ReactionOutcome::Unchanged;
        }

        if let Some(planet) = ctx.bodies.get_mut(this) {
            planet.destroy();
        }
        debug!("{name} broke apart into an asteroid");
        ReactionOutcome::Transformed { planet: this }
    }
}

impl CollisionReaction for AsteroidShatter {
    fn react(
        &self,
        ctx: &mut ReactionContext<'_>,
        this: BodyId,
        _other: BodyId,
        summary: &CollisionSummary,
    ) -> ReactionOutcome {
        let Some(asteroid) = ctx.bodies.get(this).filter(|body| !body.is_destroyed()) else {
            return ReactionOutcome::Unchanged;
        };
        if asteroid.area() <= ctx.config.min_shatter_area
            || impulse_per_density(asteroid, summary) <= ctx.config.asteroid_shatter_impulse
        {
            return ReactionOutcome::Unchanged;
        }

        let blueprints = shatter_blueprints(asteroid);
        if blueprints.is_empty() {
            return ReactionOutcome::Unchanged;
        }
        let name = asteroid.name.clone();

        let mut fragments = 0;
        for blueprint in blueprints {
            match ctx.spawner.enqueue(blueprint, ctx.config) {
                Ok(()) => fragments += 1,
                Err(err) => debug!("dropped a fragment of {name}: {err}"),
            }
        }

        if let Some(asteroid) = ctx.bodies.get_mut(this) {
            asteroid.destroy();
        }
        debug!("{name} shattered into {fragments} fragments");
        ReactionOutcome::Shattered {
            asteroid: this,
            fragments,
        }
    }
}

impl CollisionReaction for Inert {
    fn react(
        &self,
        _ctx: &mut ReactionContext<'_>,
        _this: BodyId,
        _other: BodyId,
        _summary: &CollisionSummary,
    ) -> ReactionOutcome {
        ReactionOutcome::Unchanged
    }
}
