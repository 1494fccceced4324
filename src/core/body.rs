use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    shape::{Shape, ShapeGeometry},
    types::{Aabb, MassProperties, Material},
};
use crate::utils::{
    allocator::BodyId,
    math::{normalize_degrees, Vec2Ext},
};

/// Rejected body construction input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("a polygon needs at least three vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon vertices enclose no area")]
    DegeneratePolygon,
    #[error("polygon outline is not convex")]
    NonConvex,
    #[error("dynamic bodies need a positive mass, got {0}")]
    InvalidMass(f64),
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Domain role of a body; decides how it reacts to collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet {
        population: u64,
        /// Name of the star this planet orbits.
        orbit: Option<String>,
    },
    Moon {
        /// Name of the planet this moon orbits.
        orbit: Option<String>,
    },
    Asteroid,
}

impl BodyKind {
    /// Tag used by the record format.
    pub fn tag(&self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet { .. } => "Planet",
            BodyKind::Moon { .. } => "Moon",
            BodyKind::Asteroid => "Asteroid",
        }
    }
}

/// Speed limits enforced after every impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimits {
    pub linear: f64,
    pub angular: f64,
}

/// A rigid body in the simulation.
///
/// Mass-derived quantities are private so they can only change through
/// [`Body::set_mass`], [`Body::set_static`] and shape updates, which keep
/// them consistent.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    shape: Shape,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Orientation in degrees, kept in `[0, 360)`.
    angle: f64,
    /// Radians per tick.
    pub angular_velocity: f64,
    mass_properties: MassProperties,
    pub material: Material,
    is_static: bool,
    pub resolve_collisions: bool,
    pub age: u64,
    destroyed: bool,
    limits: SpeedLimits,
}

impl Body {
    pub(crate) fn new(
        name: String,
        kind: BodyKind,
        shape: Shape,
        mass: f64,
        is_static: bool,
        material: Material,
        limits: SpeedLimits,
    ) -> Result<Self, BodyError> {
        if !mass.is_finite() {
            return Err(BodyError::NonFinite("mass"));
        }
        if !is_static && mass <= 0.0 {
            return Err(BodyError::InvalidMass(mass));
        }
        let mut body = Self {
            id: BodyId::default(),
            name,
            kind,
            shape,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            mass_properties: MassProperties::default(),
            material,
            is_static,
            resolve_collisions: true,
            age: 0,
            destroyed: false,
            limits,
        };
        body.mass_properties.mass = mass;
        body.update_mass_properties();
        Ok(body)
    }

    fn update_mass_properties(&mut self) {
        let mass = self.mass_properties.mass;
        self.mass_properties = MassProperties::compute(
            mass,
            self.shape.area(),
            self.shape.moment_of_inertia(mass),
            self.is_static,
        );
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Swaps the outline and recomputes area and inertia.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.update_mass_properties();
    }

    pub fn mass(&self) -> f64 {
        self.mass_properties.mass
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass_properties.mass = mass;
        self.update_mass_properties();
    }

    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass_properties
    }

    pub fn inverse_mass(&self) -> f64 {
        self.mass_properties.inverse_mass
    }

    pub fn inverse_inertia(&self) -> f64 {
        self.mass_properties.inverse_inertia
    }

    pub fn area(&self) -> f64 {
        self.mass_properties.area
    }

    pub fn density(&self) -> f64 {
        self.mass_properties.density
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.velocity = DVec2::ZERO;
            self.angular_velocity = 0.0;
        }
        self.update_mass_properties();
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Records an orientation without touching the outline.
    pub fn set_angle(&mut self, degrees: f64) {
        self.angle = normalize_degrees(degrees);
    }

    /// Spins the body, and its outline, by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        self.angle = normalize_degrees(self.angle + radians.to_degrees());
        self.shape.rotate(radians);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Flags the body for removal at the next cleanup.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn aabb(&self) -> Aabb {
        self.shape.bounds(self.position)
    }

    pub fn radius(&self) -> f64 {
        self.shape.radius()
    }

    /// World-space outline for polygons; `None` for circles.
    pub fn world_vertices(&self) -> Option<Vec<DVec2>> {
        self.shape
            .as_polygon()
            .map(|polygon| polygon.world_vertices(self.position))
    }

    /// Applies `impulse` at offset `r` from the centroid.
    pub fn apply_impulse(&mut self, impulse: DVec2, r: DVec2) {
        if self.is_static {
            return;
        }
        self.velocity += impulse * self.mass_properties.inverse_mass;
        self.angular_velocity += self.mass_properties.inverse_inertia * r.cross(impulse);

        self.velocity = self.velocity.clamp_length_max(self.limits.linear);
        self.angular_velocity = self
            .angular_velocity
            .clamp(-self.limits.angular, self.limits.angular);
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        self.position.distance(other.position)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::ConvexPolygon;
    use approx::assert_relative_eq;

    const LIMITS: SpeedLimits = SpeedLimits {
        linear: 100.0,
        angular: 100.0,
    };

    fn disc(mass: f64, is_static: bool) -> Body {
        Body::new(
            "disc".into(),
            BodyKind::Star,
            Shape::circle(10.0).expect("radius"),
            mass,
            is_static,
            Material::default(),
            LIMITS,
        )
        .expect("valid body")
    }

    #[test]
    fn static_body_ignores_impulses() {
        let mut body = disc(5.0, true);
        body.apply_impulse(DVec2::new(1e9, -1e9), DVec2::new(3.0, 4.0));
        assert_eq!(body.velocity, DVec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.inverse_inertia(), 0.0);
    }

    #[test]
    fn impulse_changes_linear_and_angular_velocity() {
        let mut body = disc(2.0, false);
        body.apply_impulse(DVec2::new(0.0, 4.0), DVec2::new(10.0, 0.0));
        assert_relative_eq!(body.velocity.y, 2.0);
        // inertia = 0.5 * 2 * 100 = 100; torque = 10 * 4
        assert_relative_eq!(body.angular_velocity, 0.4);
    }

    #[test]
    fn impulse_response_is_clamped() {
        let mut body = disc(1.0, false);
        body.apply_impulse(DVec2::new(1e6, 1e6), DVec2::new(0.0, 1e6));
        assert_relative_eq!(body.velocity.length(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(body.angular_velocity.abs(), 100.0);
    }

    #[test]
    fn mass_change_refreshes_derived_quantities() {
        let mut body = disc(10.0, false);
        let area = body.area();
        body.set_mass(20.0);
        assert_relative_eq!(body.density(), 20.0 / area);
        assert_relative_eq!(body.inverse_mass(), 0.05);
        assert_relative_eq!(body.mass_properties().inertia, 0.5 * 20.0 * 100.0);
    }

    #[test]
    fn rotation_wraps_degrees_and_turns_outline() {
        let hexagon = ConvexPolygon::regular(6, 10.0).expect("hexagon");
        let mut body = Body::new(
            "rock".into(),
            BodyKind::Asteroid,
            Shape::Polygon(hexagon),
            1.0,
            false,
            Material::default(),
            LIMITS,
        )
        .expect("valid body");
        body.set_angle(350.0);
        body.rotate(20f64.to_radians());
        assert_relative_eq!(body.angle(), 10.0, epsilon = 1e-9);
        let first = body.shape().as_polygon().expect("polygon").vertices()[0];
        assert_relative_eq!(first.y, 10.0 * 20f64.to_radians().sin(), epsilon = 1e-9);
    }

    #[test]
    fn dynamic_body_requires_positive_mass() {
        let err = Body::new(
            "ghost".into(),
            BodyKind::Moon { orbit: None },
            Shape::circle(1.0).expect("radius"),
            0.0,
            false,
            Material::default(),
            LIMITS,
        )
        .unwrap_err();
        assert_eq!(err, BodyError::InvalidMass(0.0));
    }
}
