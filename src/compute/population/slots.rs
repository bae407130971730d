//! Slot-arena containers with free-index reuse, and dense views of their
//! living members.
//!
//! The arena holds `capacity` slots, every one initially a dead placeholder.
//! Free slot indices live on a stack whose top is the lowest free index after
//! construction or `clear`, so slots fill in order `0, 1, 2, ...` until a
//! removal pushes a freed index back. `end` is one past the highest occupied
//! slot; iterating `0..end` and skipping dead slots visits every member.

use std::ops::Index;

use super::PopulationContainer;
use crate::compute::individual::Individual;

#[derive(Debug, Clone, Default)]
pub struct SlotPopulation {
    slots: Vec<Individual>,
    free: Vec<usize>,
    end: usize,
    id: usize,
}

impl SlotPopulation {
    pub fn new(capacity: usize, id: usize) -> Self {
        Self {
            slots: vec![Individual::default(); capacity],
            free: (0..capacity).rev().collect(),
            end: 0,
            id,
        }
    }

    /// One past the highest occupied slot.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Insert into the next free slot, returning its index.
    pub fn insert(&mut self, mut individual: Individual) -> Option<usize> {
        let i = self.free.pop()?;
        individual.set_alive();
        self.slots[i] = individual;
        if i >= self.end {
            self.end = i + 1;
        }
        Some(i)
    }

    /// Free slot `i`, returning the individual that occupied it.
    ///
    /// Removing an empty or out-of-range slot does nothing.
    pub fn remove(&mut self, i: usize) -> Option<Individual> {
        let slot = self.slots.get_mut(i)?;
        if !slot.is_alive() {
            return None;
        }
        slot.set_dead();
        let removed = slot.clone();
        self.free.push(i);
        if i + 1 == self.end {
            self.end -= 1;
            while self.end > 0 && !self.slots[self.end - 1].is_alive() {
                self.end -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, i: usize) -> Option<&Individual> {
        self.slots.get(i).filter(|ind| ind.is_alive())
    }

    /// Mutable access to an occupied slot. Liveness must be changed through
    /// `insert` and `remove`, not through this reference.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut Individual> {
        self.slots.get_mut(i).filter(|ind| ind.is_alive())
    }

    /// Exchange contents with another arena; ids stay.
    pub fn swap_members(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.slots, &mut other.slots);
        std::mem::swap(&mut self.free, &mut other.free);
        std::mem::swap(&mut self.end, &mut other.end);
    }
}

impl PopulationContainer for SlotPopulation {
    fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, 0)
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn add(&mut self, individual: Individual) {
        self.insert(individual);
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.set_dead();
        }
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev());
        self.end = 0;
    }

    fn alive(&self) -> impl Iterator<Item = &Individual> {
        self.slots[..self.end].iter().filter(|ind| ind.is_alive())
    }

    fn id(&self) -> usize {
        self.id
    }

    fn set_id(&mut self, id: usize) {
        self.id = id;
    }
}

impl Index<usize> for SlotPopulation {
    type Output = Individual;

    fn index(&self, i: usize) -> &Individual {
        &self.slots[i]
    }
}

/// Slot arena for two sexes, keeping counts of living females and males.
///
/// The sex of an individual must not change while it occupies a slot.
#[derive(Debug, Clone, Default)]
pub struct SexedSlotPopulation {
    inner: SlotPopulation,
    females: usize,
    males: usize,
}

impl SexedSlotPopulation {
    pub fn new(capacity: usize, id: usize) -> Self {
        Self {
            inner: SlotPopulation::new(capacity, id),
            females: 0,
            males: 0,
        }
    }

    pub fn females(&self) -> usize {
        self.females
    }

    pub fn males(&self) -> usize {
        self.males
    }

    pub fn end(&self) -> usize {
        self.inner.end()
    }

    pub fn insert(&mut self, individual: Individual) -> Option<usize> {
        let female = individual.is_female();
        let i = self.inner.insert(individual)?;
        if female {
            self.females += 1;
        } else {
            self.males += 1;
        }
        Some(i)
    }

    pub fn remove(&mut self, i: usize) -> Option<Individual> {
        let removed = self.inner.remove(i)?;
        if removed.is_female() {
            self.females -= 1;
        } else {
            self.males -= 1;
        }
        Some(removed)
    }

    pub fn get(&self, i: usize) -> Option<&Individual> {
        self.inner.get(i)
    }

    pub fn swap_members(&mut self, other: &mut Self) {
        self.inner.swap_members(&mut other.inner);
        std::mem::swap(&mut self.females, &mut other.females);
        std::mem::swap(&mut self.males, &mut other.males);
    }
}

impl PopulationContainer for SexedSlotPopulation {
    fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, 0)
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn add(&mut self, individual: Individual) {
        self.insert(individual);
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.females = 0;
        self.males = 0;
    }

    fn alive(&self) -> impl Iterator<Item = &Individual> {
        self.inner.alive()
    }

    fn id(&self) -> usize {
        self.inner.id()
    }

    fn set_id(&mut self, id: usize) {
        self.inner.set_id(id);
    }
}

impl Index<usize> for SexedSlotPopulation {
    type Output = Individual;

    fn index(&self, i: usize) -> &Individual {
        &self.inner[i]
    }
}

/// Dense list of the occupied slot indices of a [`SlotPopulation`].
#[derive(Debug, Clone, Default)]
pub struct LivingIndex {
    indices: Vec<usize>,
}

impl LivingIndex {
    pub fn new(population: &SlotPopulation) -> Self {
        let indices = (0..population.end())
            .filter(|&i| population[i].is_alive())
            .collect();
        Self { indices }
    }

    /// Rebuild from the current state of `population`.
    pub fn assign(&mut self, population: &SlotPopulation) {
        *self = Self::new(population);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Slot index of the `k`-th living individual.
    pub fn slot(&self, k: usize) -> usize {
        self.indices[k]
    }

    /// Forget the `k`-th entry; the last entry takes its place.
    pub fn record_death(&mut self, k: usize) {
        if k < self.indices.len() {
            self.indices.swap_remove(k);
        }
    }
}

/// Dense lists of the occupied female and male slots of a
/// [`SexedSlotPopulation`].
#[derive(Debug, Clone, Default)]
pub struct SexedLivingIndex {
    females: Vec<usize>,
    males: Vec<usize>,
}

impl SexedLivingIndex {
    pub fn new(population: &SexedSlotPopulation) -> Self {
        let mut females = Vec::with_capacity(population.females());
        let mut males = Vec::with_capacity(population.males());
        for i in 0..population.end() {
            let ind = &population[i];
            if ind.is_alive() {
                if ind.is_female() {
                    females.push(i);
                } else {
                    males.push(i);
                }
            }
        }
        Self { females, males }
    }

    pub fn assign(&mut self, population: &SexedSlotPopulation) {
        *self = Self::new(population);
    }

    pub fn len(&self) -> usize {
        self.females.len() + self.males.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn females(&self) -> usize {
        self.females.len()
    }

    pub fn males(&self) -> usize {
        self.males.len()
    }

    pub fn female_slot(&self, k: usize) -> usize {
        self.females[k]
    }

    pub fn male_slot(&self, k: usize) -> usize {
        self.males[k]
    }

    pub fn record_female_death(&mut self, k: usize) {
        if k < self.females.len() {
            self.females.swap_remove(k);
        }
    }

    pub fn record_male_death(&mut self, k: usize) {
        if k < self.males.len() {
            self.males.swap_remove(k);
        }
    }
}
