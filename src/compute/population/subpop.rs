use std::ops::{Index, IndexMut};

use super::PopulationContainer;
use crate::compute::individual::Individual;

/// Append-only subpopulation.
///
/// Individuals are added to start a generation and never removed one by one,
/// so every stored individual is alive and indices `0..len()` are dense.
/// Indexed access is for changing an individual's state, not its liveness.
#[derive(Debug, Clone, Default)]
pub struct SubPopulation {
    members: Vec<Individual>,
    capacity: usize,
    id: usize,
}

impl SubPopulation {
    pub fn new(capacity: usize, id: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
            id,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual> {
        self.members.iter_mut()
    }

    pub fn as_slice(&self) -> &[Individual] {
        &self.members
    }

    pub fn as_mut_slice(&mut self) -> &mut [Individual] {
        &mut self.members
    }

    /// Replace the contents with the given individuals, keeping at most
    /// `capacity` of them.
    pub fn refill<I: IntoIterator<Item = Individual>>(&mut self, individuals: I) {
        self.members.clear();
        for individual in individuals {
            self.add(individual);
        }
    }

    /// Exchange individuals and capacity with another subpopulation; ids stay.
    pub fn swap_members(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.members, &mut other.members);
        std::mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl PopulationContainer for SubPopulation {
    fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, 0)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn len(&self) -> usize {
        self.members.len()
    }

    fn add(&mut self, mut individual: Individual) {
        if self.members.len() < self.capacity {
            individual.set_alive();
            self.members.push(individual);
        }
    }

    fn clear(&mut self) {
        self.members.clear();
    }

    fn alive(&self) -> impl Iterator<Item = &Individual> {
        self.members.iter()
    }

    fn id(&self) -> usize {
        self.id
    }

    fn set_id(&mut self, id: usize) {
        self.id = id;
    }
}

impl Index<usize> for SubPopulation {
    type Output = Individual;

    fn index(&self, i: usize) -> &Individual {
        &self.members[i]
    }
}

impl IndexMut<usize> for SubPopulation {
    fn index_mut(&mut self, i: usize) -> &mut Individual {
        &mut self.members[i]
    }
}

impl<'a> IntoIterator for &'a SubPopulation {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
