use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ELASTICITY, DEFAULT_FRICTION};

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Tight box around a point set.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Strict overlap; boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Surface coefficients used when two bodies touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub friction: f64,
    /// Restitution; 0 is fully inelastic, 1 fully elastic.
    pub elasticity: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            elasticity: DEFAULT_ELASTICITY,
        }
    }
}

impl Material {
    pub fn new(friction: f64, elasticity: f64) -> Self {
        Self {
            friction,
            elasticity,
        }
    }

    /// Frictionless and perfectly bouncy.
    pub fn elastic() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn combined_friction(&self, other: &Material) -> f64 {
        (self.friction * self.friction + other.friction * other.friction).sqrt()
    }

    pub fn combined_elasticity(&self, other: &Material) -> f64 {
        self.elasticity.min(other.elasticity)
    }
}

/// Quantities derived from mass and shape; always recomputed together.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f64,
    pub inverse_mass: f64,
    pub area: f64,
    pub density: f64,
    pub inertia: f64,
    pub inverse_inertia: f64,
}

impl MassProperties {
    pub fn compute(mass: f64, area: f64, inertia: f64, is_static: bool) -> Self {
        let (inverse_mass, inverse_inertia) = if is_static {
            (0.0, 0.0)
        } else {
            (safe_inverse(mass), safe_inverse(inertia))
        };
        Self {
            mass,
            inverse_mass,
            area,
            density: if area > 0.0 { mass / area } else { 0.0 },
            inertia,
            inverse_inertia,
        }
    }
}

fn safe_inverse(value: f64) -> f64 {
    if value.abs() < f64::EPSILON {
        0.0
    } else {
        1.0 / value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::new(DVec2::ZERO, DVec2::splat(1.0));
        let b = Aabb::new(DVec2::new(1.0, 0.0), DVec2::new(2.0, 1.0));
        let c = Aabb::new(DVec2::splat(0.5), DVec2::splat(1.5));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn static_mass_properties_have_zero_inverses() {
        let props = MassProperties::compute(10.0, 5.0, 20.0, true);
        assert_eq!(props.inverse_mass, 0.0);
        assert_eq!(props.inverse_inertia, 0.0);
        assert_relative_eq!(props.density, 2.0);

        let dynamic = MassProperties::compute(10.0, 5.0, 20.0, false);
        assert_relative_eq!(dynamic.inverse_mass, 0.1);
        assert_relative_eq!(dynamic.inverse_inertia, 0.05);
    }

    #[test]
    fn material_mixing() {
        let a = Material::new(0.3, 0.5);
        let b = Material::new(0.4, 0.2);
        assert_relative_eq!(a.combined_friction(&b), 0.5);
        assert_relative_eq!(a.combined_elasticity(&b), 0.2);
    }
}
