//! Core types describing bodies, their outlines, and how they are constructed.

pub mod body;
pub mod factory;
pub mod shape;
pub mod types;

pub use body::{Body, BodyError, BodyKind, SpeedLimits};
pub use factory::{BodyBlueprint, BodyParams, NameGenerator, ShapeSpec};
pub use shape::{Circle, ConvexPolygon, Shape, ShapeGeometry};
pub use types::{Aabb, MassProperties, Material};
