use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::WorldConfig,
    core::{
        body::{Body, BodyError},
        factory::{BodyBlueprint, NameGenerator},
    },
};

/// Builds bodies for the world and holds the ones created mid-tick.
///
/// Queued bodies only join the population at cleanup, so they are never
/// collided against during the tick that produced them.
#[derive(Debug, Clone)]
pub struct Spawner {
    names: NameGenerator,
    rng: StdRng,
    pending: Vec<Body>,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            names: NameGenerator::new(),
            rng: StdRng::seed_from_u64(seed),
            pending: Vec::new(),
        }
    }

    pub fn build(&mut self, blueprint: BodyBlueprint, config: &WorldConfig) -> Result<Body, BodyError> {
        blueprint.build(&mut self.names, config)
    }

    pub fn enqueue(&mut self, blueprint: BodyBlueprint, config: &WorldConfig) -> Result<(), BodyError> {
        let body = self.build(blueprint, config)?;
        self.pending.push(body);
        Ok(())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn take_pending(&mut self) -> Vec<Body> {
        std::mem::take(&mut self.pending)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factory::BodyParams;

    #[test]
    fn queued_bodies_get_sequential_names() {
        let config = WorldConfig::default();
        let mut spawner = Spawner::new(1);
        spawner
            .enqueue(BodyBlueprint::star(5.0, BodyParams::default()), &config)
            .expect("valid star");
        spawner
            .enqueue(BodyBlueprint::moon(2.0, None, BodyParams::default()), &config)
            .expect("valid moon");
        assert_eq!(spawner.pending_len(), 2);

        let names: Vec<String> = spawner.take_pending().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Object 0", "Object 1"]);
        assert_eq!(spawner.pending_len(), 0);
    }

    #[test]
    fn invalid_blueprints_are_not_queued() {
        let config = WorldConfig::default();
        let mut spawner = Spawner::new(1);
        let result = spawner.enqueue(BodyBlueprint::star(-1.0, BodyParams::default()), &config);
        assert!(matches!(result, Err(BodyError::InvalidRadius(_))));
        assert_eq!(spawner.pending_len(), 0);
    }
}
