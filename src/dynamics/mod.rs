//! Simulation dynamics modules: integration, gravity and the contact solver.

pub mod forces;
pub mod friction;
pub mod integrator;
pub mod solver;

pub use forces::{ForceGenerator, ForceRegistry, NewtonianGravity};
pub use integrator::{IntegrationOutcome, Integrator};
pub use solver::{
    CollisionSummary, ContactConstraint, ContactPoint, SequentialImpulseSolver, SolverSettings,
};
