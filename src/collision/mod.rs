//! Collision detection modules: broad-phase, narrow-phase, contact clipping and manifolds.

pub mod broadphase;
pub mod clipping;
pub mod contact;
pub mod narrowphase;

pub use broadphase::BroadPhase;
pub use contact::ContactManifold;
pub use narrowphase::{NarrowPhase, SatAlgorithm};
