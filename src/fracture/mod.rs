//! Brittle fracture: Delaunay re-triangulation of polygon outlines and random asteroid outlines.

pub mod generator;
pub mod shatter;
pub mod triangulation;

pub use generator::random_outline;
pub use shatter::{fragment_outline, shatter_blueprints, Fragment};
pub use triangulation::{bowyer_watson, Triangle};
