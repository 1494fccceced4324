use std::collections::HashMap;

use crate::utils::allocator::BodyId;

/// Unordered body pair, stored with the smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(BodyId, BodyId);

impl PairKey {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> BodyId {
        self.0
    }

    pub fn second(&self) -> BodyId {
        self.1
    }
}

/// Consecutive-tick contact counters keyed by body pair.
///
/// A pair that is not reported as colliding in a tick loses its counter, so
/// every stored value counts an unbroken run of contact.
#[derive(Debug, Default, Clone)]
pub struct ContactTracker {
    durations: HashMap<PairKey, u32>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tracked set with this tick's colliding pairs.
    pub fn record_tick(&mut self, colliding: impl IntoIterator<Item = (BodyId, BodyId)>) {
        let mut next = HashMap::with_capacity(self.durations.len());
        for (a, b) in colliding {
            let key = PairKey::new(a, b);
            let ticks = self.durations.get(&key).copied().unwrap_or(0);
            next.insert(key, ticks.saturating_add(1));
        }
        self.durations = next;
    }

    pub fn duration(&self, a: BodyId, b: BodyId) -> u32 {
        self.durations
            .get(&PairKey::new(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Pairs in contact for more than `threshold` ticks, in id order.
    pub fn exceeding(&self, threshold: u32) -> Vec<PairKey> {
        let mut pairs: Vec<PairKey> = self
            .durations
            .iter()
            .filter(|(_, ticks)| **ticks > threshold)
            .map(|(key, _)| *key)
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Drops every pair that mentions a body failing `alive`.
    pub fn prune(&mut self, mut alive: impl FnMut(BodyId) -> bool) {
        self.durations
            .retain(|key, _| alive(key.first()) && alive(key.second()));
    }

    pub fn forget(&mut self, a: BodyId, b: BodyId) {
        self.durations.remove(&PairKey::new(a, b));
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn clear(&mut self) {
        self.durations.clear();
    }
}
