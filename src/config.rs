//! Global configuration constants for the Celestial Impulse engine.

use serde::{Deserialize, Serialize};

/// Sequential-impulse iterations performed per tick.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 100;

/// Baumgarte factor converting penetration into a separating velocity.
pub const DEFAULT_BIAS_FACTOR: f64 = 0.01;

/// Penetration tolerated before positional correction kicks in.
pub const DEFAULT_ALLOWED_PENETRATION: f64 = 0.1;

/// Closing speed (along the normal) below which restitution is applied.
pub const DEFAULT_BOUNCE_THRESHOLD: f64 = -0.1;

/// Newtonian gravity constant.
pub const DEFAULT_GRAVITY_CONSTANT: f64 = 0.05;

/// Lower bound applied to squared separation in the gravity law.
pub const DEFAULT_GRAVITY_DISTANCE_FLOOR: f64 = 100.0;

/// Half extent of the square world; bodies beyond it are destroyed.
pub const DEFAULT_WORLD_BOUNDARY: f64 = 10_000.0;

/// Maximum linear speed after an impulse.
pub const DEFAULT_MAX_SPEED: f64 = 100.0;

/// Maximum angular speed (radians per tick) after an impulse.
pub const DEFAULT_MAX_ANGULAR_SPEED: f64 = 100.0;

/// Consecutive contact ticks after which two bodies merge.
pub const DEFAULT_MERGE_DURATION: u32 = 3000;

/// Shrinks the merged circle relative to the combined area.
pub const DEFAULT_MERGE_RADIUS_FACTOR: f64 = 1.0 / 1.2;

/// Impulse per unit density above which a planet breaks into an asteroid.
pub const DEFAULT_PLANET_BREAK_IMPULSE: f64 = 800.0;

/// Impulse per unit density above which an asteroid may shatter.
pub const DEFAULT_ASTEROID_SHATTER_IMPULSE: f64 = 1500.0;

/// Asteroids at or below this area never shatter.
pub const DEFAULT_MIN_SHATTER_AREA: f64 = 5000.0;

pub const DEFAULT_FRICTION: f64 = 0.3;
pub const DEFAULT_ELASTICITY: f64 = 0.0;

/// Vertex count range (inclusive, exclusive) for randomly outlined asteroids.
pub const DEFAULT_RANDOM_VERTEX_RANGE: (usize, usize) = (5, 10);

/// Fraction of the even angular spacing each random vertex may drift by.
pub const DEFAULT_RANDOM_ANGLE_VARIATION: f64 = 0.5;

pub const DEFAULT_ASTEROID_SIDES: usize = 6;
pub const DEFAULT_ASTEROID_RADIUS: f64 = 100.0;

/// Wall-clock budget of one tick before a warning is logged.
pub const DEFAULT_TICK_BUDGET_MS: f64 = 16.0;

pub const DEFAULT_RNG_SEED: u64 = 0x5eed_0f_0b17;

/// Tunables for a [`crate::PhysicsWorld`]; missing fields fall back to the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub solver_iterations: u32,
    pub bias_factor: f64,
    pub allowed_penetration: f64,
    pub bounce_threshold: f64,
    pub gravity_constant: f64,
    pub gravity_distance_floor: f64,
    pub world_boundary: f64,
    pub max_speed: f64,
    pub max_angular_speed: f64,
    pub merge_duration: u32,
    pub merge_radius_factor: f64,
    pub planet_break_impulse: f64,
    pub asteroid_shatter_impulse: f64,
    pub min_shatter_area: f64,
    pub default_friction: f64,
    pub default_elasticity: f64,
    pub random_vertex_range: (usize, usize),
    pub random_angle_variation: f64,
    pub tick_budget_ms: f64,
    pub rng_seed: u64,
    pub parallel_detection: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            bias_factor: DEFAULT_BIAS_FACTOR,
            allowed_penetration: DEFAULT_ALLOWED_PENETRATION,
            bounce_threshold: DEFAULT_BOUNCE_THRESHOLD,
            gravity_constant: DEFAULT_GRAVITY_CONSTANT,
            gravity_distance_floor: DEFAULT_GRAVITY_DISTANCE_FLOOR,
            world_boundary: DEFAULT_WORLD_BOUNDARY,
            max_speed: DEFAULT_MAX_SPEED,
            max_angular_speed: DEFAULT_MAX_ANGULAR_SPEED,
            merge_duration: DEFAULT_MERGE_DURATION,
            merge_radius_factor: DEFAULT_MERGE_RADIUS_FACTOR,
            planet_break_impulse: DEFAULT_PLANET_BREAK_IMPULSE,
            asteroid_shatter_impulse: DEFAULT_ASTEROID_SHATTER_IMPULSE,
            min_shatter_area: DEFAULT_MIN_SHATTER_AREA,
            default_friction: DEFAULT_FRICTION,
            default_elasticity: DEFAULT_ELASTICITY,
            random_vertex_range: DEFAULT_RANDOM_VERTEX_RANGE,
            random_angle_variation: DEFAULT_RANDOM_ANGLE_VARIATION,
            tick_budget_ms: DEFAULT_TICK_BUDGET_MS,
            rng_seed: DEFAULT_RNG_SEED,
            parallel_detection: cfg!(feature = "parallel"),
        }
    }
}

impl WorldConfig {
    /// Same defaults with gravity switched off; handy for isolated collision setups.
    pub fn without_gravity() -> Self {
        Self {
            gravity_constant: 0.0,
            ..Self::default()
        }
    }
}
