use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{
    body::{Body, BodyError, BodyKind, SpeedLimits},
    shape::{Circle, ConvexPolygon, Shape},
    types::Material,
};
use crate::config::WorldConfig;

/// Hands out "Object N" names; one counter per world.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    next: u64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("Object {}", self.next);
        self.next += 1;
        name
    }

    /// Uses `name` when given, otherwise draws the next generated one.
    pub fn resolve(&mut self, name: Option<String>) -> String {
        match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.next_name(),
        }
    }
}

/// State shared by every body kind at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub name: Option<String>,
    pub position: DVec2,
    pub mass: f64,
    pub is_static: bool,
    pub resolve_collisions: bool,
    pub velocity: DVec2,
    pub age: u64,
    /// Degrees.
    pub angle: f64,
    /// Radians per tick.
    pub angular_velocity: f64,
    /// Falls back to the world's default friction and elasticity.
    pub material: Option<Material>,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            name: None,
            position: DVec2::ZERO,
            mass: 1.0,
            is_static: false,
            resolve_collisions: true,
            velocity: DVec2::ZERO,
            age: 0,
            angle: 0.0,
            angular_velocity: 0.0,
            material: None,
        }
    }
}

impl BodyParams {
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = degrees;
        self
    }

    pub fn age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn resolve_collisions(mut self, resolve: bool) -> Self {
        self.resolve_collisions = resolve;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Copies the kinematic state of an existing body.
    pub fn from_body(body: &Body) -> Self {
        Self {
            name: None,
            position: body.position,
            mass: body.mass(),
            is_static: body.is_static(),
            resolve_collisions: body.resolve_collisions,
            velocity: body.velocity,
            age: body.age,
            angle: body.angle(),
            angular_velocity: body.angular_velocity,
            material: Some(body.material),
        }
    }
}

/// Outline as supplied by a caller, before re-centring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeSpec {
    Circle { radius: f64 },
    /// Vertices relative to `BodyParams::position`.
    Polygon { vertices: Vec<DVec2> },
}

/// Everything needed to spawn one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyBlueprint {
    pub kind: BodyKind,
    pub shape: ShapeSpec,
    pub params: BodyParams,
}

impl BodyBlueprint {
    pub fn star(radius: f64, params: BodyParams) -> Self {
        Self {
            kind: BodyKind::Star,
            shape: ShapeSpec::Circle { radius },
            params,
        }
    }

    pub fn planet(radius: f64, population: u64, orbit: Option<String>, params: BodyParams) -> Self {
        Self {
            kind: BodyKind::Planet { population, orbit },
            shape: ShapeSpec::Circle { radius },
            params,
        }
    }

    pub fn moon(radius: f64, orbit: Option<String>, params: BodyParams) -> Self {
        Self {
            kind: BodyKind::Moon { orbit },
            shape: ShapeSpec::Circle { radius },
            params,
        }
    }

    pub fn asteroid(vertices: Vec<DVec2>, params: BodyParams) -> Self {
        Self {
            kind: BodyKind::Asteroid,
            shape: ShapeSpec::Polygon { vertices },
            params,
        }
    }

    /// Snapshot of a live body, suitable for saving or cloning.
    pub fn from_body(body: &Body) -> Self {
        let shape = match body.shape() {
            Shape::Circle(circle) => ShapeSpec::Circle {
                radius: circle.radius,
            },
            Shape::Polygon(polygon) => ShapeSpec::Polygon {
                vertices: polygon.vertices().to_vec(),
            },
        };
        let mut params = BodyParams::from_body(body);
        params.name = Some(body.name.clone());
        Self {
            kind: body.kind.clone(),
            shape,
            params,
        }
    }

    /// Validates the blueprint and produces a body that is not yet in any world.
    pub fn build(self, names: &mut NameGenerator, config: &WorldConfig) -> Result<Body, BodyError> {
        let BodyBlueprint {
            kind,
            shape,
            params,
        } = self;

        if !params.position.is_finite() {
            return Err(BodyError::NonFinite("position"));
        }
        if !params.velocity.is_finite() {
            return Err(BodyError::NonFinite("velocity"));
        }
        if !params.angle.is_finite() || !params.angular_velocity.is_finite() {
            return Err(BodyError::NonFinite("orientation"));
        }

        let (shape, centroid) = match shape {
            ShapeSpec::Circle { radius } => (Shape::Circle(Circle::new(radius)?), DVec2::ZERO),
            ShapeSpec::Polygon { vertices } => {
                let (polygon, centroid) = ConvexPolygon::from_points(vertices)?;
                (Shape::Polygon(polygon), centroid)
            }
        };

        let material = params.material.unwrap_or(Material::new(
            config.default_friction,
            config.default_elasticity,
        ));
        let limits = SpeedLimits {
            linear: config.max_speed,
            angular: config.max_angular_speed,
        };

        let mut body = Body::new(
            names.resolve(params.name),
            kind,
            shape,
            params.mass,
            params.is_static,
            material,
            limits,
        )?;
        body.position = params.position + centroid;
        body.resolve_collisions = params.resolve_collisions;
        body.age = params.age;
        body.set_angle(params.angle);
        if !body.is_static() {
            body.velocity = params.velocity.clamp_length_max(limits.linear);
            body.angular_velocity = params.angular_velocity;
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn names_count_up_and_explicit_names_win() {
        let mut names = NameGenerator::new();
        assert_eq!(names.resolve(None), "Object 0");
        assert_eq!(names.resolve(Some("Sol".into())), "Sol");
        assert_eq!(names.resolve(Some("  ".into())), "Object 1");
    }

    #[test]
    fn polygon_blueprint_moves_position_to_centroid() {
        let mut names = NameGenerator::new();
        let blueprint = BodyBlueprint::asteroid(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(4.0, 0.0),
                DVec2::new(4.0, 4.0),
                DVec2::new(0.0, 4.0),
            ],
            BodyParams::at(DVec2::new(100.0, 100.0)).mass(16.0),
        );
        let body = blueprint
            .build(&mut names, &WorldConfig::default())
            .expect("valid asteroid");
        assert_relative_eq!(body.position.x, 102.0, epsilon = 1e-12);
        assert_relative_eq!(body.position.y, 102.0, epsilon = 1e-12);
        assert_relative_eq!(body.density(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn concave_asteroid_is_refused() {
        let mut names = NameGenerator::new();
        let result = BodyBlueprint::asteroid(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(4.0, 2.0),
                DVec2::new(0.0, 4.0),
                DVec2::new(1.0, 2.0),
            ],
            BodyParams::default(),
        )
        .build(&mut names, &WorldConfig::default());
        assert!(matches!(result, Err(BodyError::NonConvex)));
    }

    #[test]
    fn static_params_discard_velocity() {
        let mut names = NameGenerator::new();
        let body = BodyBlueprint::star(
            50.0,
            BodyParams::default()
                .fixed()
                .velocity(DVec2::new(3.0, 0.0))
                .angular_velocity(1.0),
        )
        .build(&mut names, &WorldConfig::default())
        .expect("valid star");
        assert_eq!(body.velocity, DVec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn round_trips_through_blueprint() {
        let mut names = NameGenerator::new();
        let config = WorldConfig::default();
        let original = BodyBlueprint::planet(
            12.0,
            7,
            Some("Sol".into()),
            BodyParams::at(DVec2::new(1.0, 2.0)).mass(30.0).angle(45.0),
        )
        .build(&mut names, &config)
        .expect("valid planet");
        let copy = BodyBlueprint::from_body(&original)
            .build(&mut names, &config)
            .expect("valid copy");
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.kind, original.kind);
        assert_eq!(copy.position, original.position);
        assert_relative_eq!(copy.angle(), 45.0);
    }
}
