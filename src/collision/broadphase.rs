use crate::{
    core::{body::Body, types::Aabb},
    utils::allocator::{Arena, BodyId},
};

/// Brute-force pair finder over precomputed bounding boxes.
///
/// Every unordered pair of collision-enabled live bodies is tested once; there
/// is no spatial index.
#[derive(Debug, Default, Clone)]
pub struct BroadPhase {
    proxies: Vec<(BodyId, Aabb)>,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the cached boxes from the current body state.
    pub fn update(&mut self, bodies: &Arena<Body>) {
        self.proxies.clear();
        self.proxies.extend(
            bodies
                .iter()
                .filter(|(_, body)| body.resolve_collisions && !body.is_destroyed())
                .map(|(id, body)| (id, body.aabb())),
        );
    }

    /// Pairs whose boxes overlap, in slot order.
    pub fn overlapping_pairs(&self) -> Vec<(BodyId, BodyId)> {
        let mut pairs = Vec::new();
        for (i, (id_a, box_a)) in self.proxies.iter().enumerate() {
            for (id_b, box_b) in &self.proxies[i + 1..] {
                if box_a.overlaps(box_b) {
                    pairs.push((*id_a, *id_b));
                }
            }
        }
        pairs
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::WorldConfig,
        core::factory::{BodyBlueprint, BodyParams, NameGenerator},
    };
    use glam::DVec2;

    fn arena_with(positions: &[(f64, f64)], radius: f64) -> (Arena<Body>, Vec<BodyId>) {
        let mut names = NameGenerator::new();
        let config = WorldConfig::default();
        let mut arena = Arena::new();
        let ids = positions
            .iter()
            .map(|(x, y)| {
                let body = BodyBlueprint::moon(radius, None, BodyParams::at(DVec2::new(*x, *y)))
                    .build(&mut names, &config)
                    .expect("valid moon");
                arena.insert(body)
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn only_overlapping_boxes_pair_up() {
        let (arena, ids) = arena_with(&[(0.0, 0.0), (15.0, 0.0), (100.0, 0.0)], 10.0);
        let mut broadphase = BroadPhase::new();
        broadphase.update(&arena);
        assert_eq!(broadphase.overlapping_pairs(), vec![(ids[0], ids[1])]);
        assert_eq!(broadphase.proxy_count(), 3);
    }

    #[test]
    fn non_colliding_bodies_are_skipped() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (5.0, 0.0)], 10.0);
        if let Some(body) = arena.get_mut(ids[1]) {
            body.resolve_collisions = false;
        }
        let mut broadphase = BroadPhase::new();
        broadphase.update(&arena);
        assert_eq!(broadphase.proxy_count(), 1);
        assert!(broadphase.overlapping_pairs().is_empty());
    }
}
