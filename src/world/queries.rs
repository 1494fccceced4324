//! Read-mostly queries over the live population.

use std::collections::HashSet;

use super::PhysicsWorld;
use crate::{
    core::body::{Body, BodyKind},
    utils::allocator::BodyId,
};

/// Greedy walk between two planets.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetRoute {
    /// Planet names in visiting order, both ends included.
    pub planets: Vec<String>,
    pub distance: f64,
}

fn orbit_matches(orbit: &Option<String>, name: &str) -> bool {
    orbit
        .as_deref()
        .map(|orbit| orbit.eq_ignore_ascii_case(name))
        .unwrap_or(false)
}

impl PhysicsWorld {
    fn live_bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values().filter(|body| !body.is_destroyed())
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Body> {
        let wanted = name.to_lowercase();
        self.live_bodies()
            .find(|body| body.name.to_lowercase() == wanted)
    }

    pub fn older_than(&self, age: u64) -> Vec<&Body> {
        self.live_bodies().filter(|body| body.age > age).collect()
    }

    pub fn moons_of(&self, planet: &str) -> Vec<&Body> {
        self.live_bodies()
            .filter(|body| matches!(&body.kind, BodyKind::Moon { orbit } if orbit_matches(orbit, planet)))
            .collect()
    }

    pub fn planets_of(&self, star: &str) -> Vec<&Body> {
        self.live_bodies()
            .filter(|body| matches!(&body.kind, BodyKind::Planet { orbit, .. } if orbit_matches(orbit, star)))
            .collect()
    }

    /// Live bodies in ascending area; equal areas keep slot order.
    pub fn sorted_by_area(&self) -> Vec<&Body> {
        let mut bodies: Vec<&Body> = self.live_bodies().collect();
        bodies.sort_by(|a, b| a.area().total_cmp(&b.area()));
        bodies
    }

    pub fn average_area(&self) -> Option<f64> {
        let (count, total) = self
            .live_bodies()
            .fold((0usize, 0.0), |(n, sum), body| (n + 1, sum + body.area()));
        (count > 0).then(|| total / count as f64)
    }

    pub fn average_age(&self) -> Option<f64> {
        let (count, total) = self
            .live_bodies()
            .fold((0usize, 0.0), |(n, sum), body| (n + 1, sum + body.age as f64));
        (count > 0).then(|| total / count as f64)
    }

    pub fn largest_moon(&self) -> Option<&Body> {
        self.live_bodies()
            .filter(|body| matches!(body.kind, BodyKind::Moon { .. }))
            .max_by(|a, b| a.area().total_cmp(&b.area()))
    }

    pub fn most_populated_planet(&self) -> Option<&Body> {
        self.live_bodies()
            .filter_map(|body| match body.kind {
                BodyKind::Planet { population, .. } => Some((population, body)),
                _ => None,
            })
            .max_by_key(|(population, _)| *population)
            .map(|(_, body)| body)
    }

    pub fn oldest_star(&self) -> Option<&Body> {
        self.live_bodies()
            .filter(|body| matches!(body.kind, BodyKind::Star))
            .max_by_key(|body| body.age)
    }

    pub fn fastest_asteroid(&self) -> Option<&Body> {
        self.live_bodies()
            .filter(|body| matches!(body.kind, BodyKind::Asteroid))
            .max_by(|a, b| a.speed().total_cmp(&b.speed()))
    }

    /// Whether the planet sits between 100 and 200 radii of the star it orbits.
    ///
    /// A planet outside that band, or whose star cannot be found, has its
    /// population reset to zero. Non-planets always return `false`.
    pub fn supports_life(&mut self, planet: BodyId) -> bool {
        let (position, orbit) = match self.bodies.get(planet) {
            Some(Body {
                kind: BodyKind::Planet { orbit, .. },
                position,
                ..
            }) => (*position, orbit.clone()),
            _ => return false,
        };

        let habitable = orbit
            .as_deref()
            .and_then(|star| self.find_by_name(star))
            .filter(|star| matches!(star.kind, BodyKind::Star))
            .map(|star| {
                let distance = star.position.distance(position);
                let radius = star.radius();
                (100.0 * radius..=200.0 * radius).contains(&distance)
            })
            .unwrap_or(false);

        if !habitable {
            if let Some(Body {
                kind: BodyKind::Planet { population, .. },
                ..
            }) = self.bodies.get_mut(planet)
            {
                *population = 0;
            }
        }
        habitable
    }

    /// Walks from planet `from` to planet `to`, always hopping to the nearest
    /// planet not yet visited. Fails when a hop would reach `max_hop` or more,
    /// when no unvisited planet remains, or when either end is unknown.
    pub fn planet_route(&self, from: &str, to: &str, max_hop: f64) -> Option<PlanetRoute> {
        let planets: Vec<&Body> = self
            .live_bodies()
            .filter(|body| matches!(body.kind, BodyKind::Planet { .. }))
            .collect();
        let named = |name: &str| {
            planets
                .iter()
                .position(|planet| planet.name.eq_ignore_ascii_case(name))
        };

        let target = named(to)?;
        let mut current = named(from)?;
        let mut visited = HashSet::from([current]);
        let mut route = PlanetRoute {
            planets: vec![planets[current].name.clone()],
            distance: 0.0,
        };

        while current != target {
            let (next, hop) = planets
                .iter()
                .enumerate()
                .filter(|(index, _)| !visited.contains(index))
                .map(|(index, planet)| (index, planets[current].distance_to(planet)))
                .min_by(|a, b| a.1.total_cmp(&b.1))?;
            if hop >= max_hop {
                return None;
            }
            visited.insert(next);
            route.planets.push(planets[next].name.clone());
            route.distance += hop;
            current = next;
        }
        Some(route)
    }
}
