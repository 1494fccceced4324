use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Slot index plus the generation it was handed out under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Stable handle to a body stored in the world's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct BodyId(pub GenerationalId);

impl BodyId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self(GenerationalId::new(index, generation))
    }

    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self(GenerationalId::new(usize::MAX, 0))
    }
}

/// Generational arena; removed slots bump their generation so old ids stop resolving.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, item: T) -> BodyId {
        self.insert_with(|_| item)
    }

    /// Inserts a value built from the id it is about to receive.
    pub fn insert_with(&mut self, build: impl FnOnce(BodyId) -> T) -> BodyId {
        self.live += 1;
        if let Some(index) = self.free_list.pop_front() {
            let id = BodyId::new(index, self.generations[index]);
            self.items[index] = Some(build(id));
            return id;
        }

        let index = self.items.len();
        let id = BodyId::new(index, 0);
        self.items.push(Some(build(id)));
        self.generations.push(0);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&T> {
        if self.contains(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut T> {
        if self.contains(id) {
            self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    /// Disjoint mutable borrows of two live entries, in argument order.
    pub fn get2_mut(&mut self, id_a: BodyId, id_b: BodyId) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() {
            return None;
        }

        if !self.contains(id_a) || !self.contains(id_b) {
            return None;
        }

        let (first, second, flipped) = if id_a.index() < id_b.index() {
            (id_a, id_b, false)
        } else {
            (id_b, id_a, true)
        };

        let (left, right) = self.items.split_at_mut(second.index());
        let first_slot = left
            .get_mut(first.index())
            .and_then(|slot| slot.as_mut())?;
        let second_slot = right.get_mut(0).and_then(|slot| slot.as_mut())?;

        if flipped {
            Some((second_slot, first_slot))
        } else {
            Some((first_slot, second_slot))
        }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let slot = self.items.get_mut(id.index())?;
        let taken = slot.take();
        if taken.is_some() {
            self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
            self.free_list.push_back(id.index());
            self.live -= 1;
        }
        taken
    }

    /// Removes every entry matching `remove`, handing the removed values back.
    pub fn drain_where(&mut self, mut remove: impl FnMut(&T) -> bool) -> Vec<(BodyId, T)> {
        let doomed: Vec<BodyId> = self
            .iter()
            .filter(|(_, item)| remove(item))
            .map(|(id, _)| id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.remove(id).map(|item| (id, item)))
            .collect()
    }

    /// Live entries in slot order, paired with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &T)> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|item| (BodyId::new(index, self.generations[index]), item))
        })
    }

    pub fn values(&self) -> ArenaValues<'_, T> {
        ArenaValues {
            inner: self.items.iter(),
        }
    }

    pub fn values_mut(&mut self) -> ArenaValuesMut<'_, T> {
        ArenaValuesMut {
            inner: self.items.iter_mut(),
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// True when `id` still refers to the value it was issued for.
    pub fn contains(&self, id: BodyId) -> bool {
        self.generations
            .get(id.index())
            .map(|gen| *gen == id.generation())
            .unwrap_or(false)
            && self.items[id.index()].is_some()
    }
}

pub struct ArenaValues<'a, T> {
    inner: std::slice::Iter<'a, Option<T>>,
}

impl<'a, T> Iterator for ArenaValues<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Some(item) = slot.as_ref() {
                return Some(item);
            }
        }
        None
    }
}

pub struct ArenaValuesMut<'a, T> {
    inner: std::slice::IterMut<'a, Option<T>>,
}

impl<'a, T> Iterator for ArenaValuesMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Some(item) = slot.as_mut() {
                return Some(item);
            }
        }
        None
    }
}
