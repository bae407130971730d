use std::ops::{Index, IndexMut};

use super::{PopulationContainer, SubPopulation};

/// Ordered collection of subpopulations sharing one capacity.
#[derive(Debug, Clone)]
pub struct Metapopulation<C = SubPopulation> {
    subpopulations: Vec<C>,
    capacity: usize,
}

impl<C: PopulationContainer> Metapopulation<C> {
    /// `count` empty subpopulations numbered `0..count`.
    pub fn new(count: usize, capacity: usize) -> Self {
        let subpopulations = (0..count)
            .map(|id| {
                let mut sp = C::with_capacity(capacity);
                sp.set_id(id);
                sp
            })
            .collect();
        Self {
            subpopulations,
            capacity,
        }
    }

    /// Capacity of each subpopulation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of subpopulations.
    #[inline]
    pub fn len(&self) -> usize {
        self.subpopulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subpopulations.is_empty()
    }

    /// Number of living individuals over all subpopulations.
    pub fn total_alive(&self) -> usize {
        self.subpopulations.iter().map(|sp| sp.len()).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.subpopulations.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, C> {
        self.subpopulations.iter_mut()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.subpopulations
    }

    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.subpopulations
    }

    /// Empty every subpopulation.
    pub fn clear(&mut self) {
        for sp in &mut self.subpopulations {
            sp.clear();
        }
    }

    /// Exchange subpopulations with another metapopulation.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.subpopulations, &mut other.subpopulations);
        std::mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl<C> Index<usize> for Metapopulation<C> {
    type Output = C;

    fn index(&self, k: usize) -> &C {
        &self.subpopulations[k]
    }
}

impl<C> IndexMut<usize> for Metapopulation<C> {
    fn index_mut(&mut self, k: usize) -> &mut C {
        &mut self.subpopulations[k]
    }
}
