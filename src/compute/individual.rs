//! Individuals: genotype, phenotype, subpopulation membership and liveness.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::genetics::{Diplotype, Gamete, Genotype, MutationParams, MutationShape};
use super::phenotype::Phenotype;
use crate::schema::LocusArray;

/// An individual in a subpopulation.
///
/// `alive` only records whether the individual occupies a container slot;
/// nobody ages or dies during a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genotype: Diplotype,
    pub phenotype: Phenotype,
    /// Subpopulation the individual belongs to.
    pub subpopulation: usize,
    pub alive: bool,
}

impl Default for Individual {
    /// A "dead" placeholder, used to fill empty container slots.
    fn default() -> Self {
        let genotype = Diplotype::default();
        Self {
            phenotype: Phenotype::from_genotype(&genotype, true),
            genotype,
            subpopulation: 0,
            alive: false,
        }
    }
}

impl Individual {
    /// Newborn carrying two copies of one gamete.
    pub fn from_gamete(gamete: Gamete, subpopulation: usize) -> Self {
        Self::from_genotype(Diplotype::homozygous(gamete), subpopulation)
    }

    /// Newborn from a maternal and a paternal gamete.
    pub fn from_gametes(maternal: Gamete, paternal: Gamete, subpopulation: usize) -> Self {
        Self::from_genotype(Diplotype::new(maternal, paternal), subpopulation)
    }

    fn from_genotype(genotype: Diplotype, subpopulation: usize) -> Self {
        Self {
            phenotype: Phenotype::from_genotype(&genotype, true),
            genotype,
            subpopulation,
            alive: true,
        }
    }

    /// Assemble an individual from stored parts without re-expressing the
    /// genotype.
    pub fn from_parts(
        genotype: Diplotype,
        phenotype: Phenotype,
        subpopulation: usize,
        alive: bool,
    ) -> Self {
        Self {
            genotype,
            phenotype,
            subpopulation,
            alive,
        }
    }

    /// Gamete for an offspring, using the record's recombination rates.
    pub fn gamete<S, R>(&self, params: &MutationParams<S>, rng: &mut R) -> Gamete
    where
        S: MutationShape,
        R: Rng + ?Sized,
    {
        self.genotype.gamete(params, rng)
    }

    /// Gamete for an offspring with caller-supplied recombination rates.
    pub fn gamete_with_rho<S, R>(
        &self,
        params: &MutationParams<S>,
        rho: &LocusArray,
        rng: &mut R,
    ) -> Gamete
    where
        S: MutationShape,
        R: Rng + ?Sized,
    {
        self.genotype.gamete_with_rho(params, rho, rng)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn set_alive(&mut self) {
        self.alive = true;
    }

    #[inline]
    pub fn set_dead(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn is_female(&self) -> bool {
        self.phenotype.female
    }

    #[inline]
    pub fn set_female(&mut self, female: bool) {
        self.phenotype.female = female;
    }

    pub fn column_heads() -> String {
        format!(
            "{}\t{}\tSubPop\tAlive",
            Diplotype::column_heads(),
            Phenotype::column_heads()
        )
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.genotype,
            self.phenotype,
            self.subpopulation,
            u8::from(self.alive)
        )
    }
}
