//! Diploid and haploid genotypes built from gametes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gamete::Gamete;
use super::mutation::{MutationParams, MutationShape};
use crate::schema::{LocusArray, NUM_LOCI};

/// A genotype that expresses trait values and transmits gametes.
pub trait Genotype: Clone + Send + Sync {
    /// Genotypic trait values, one per locus.
    fn value(&self) -> LocusArray;

    /// Produce a new (mutated) gamete for transmission to an offspring.
    fn gamete<S, R>(&self, params: &MutationParams<S>, rng: &mut R) -> Gamete
    where
        S: MutationShape,
        R: Rng + ?Sized;

    /// Tab-separated column headers of the genotype's text form.
    fn column_heads() -> String;
}

/// Maternal and paternal gametes with additive allelic effects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Diplotype {
    pub maternal: Gamete,
    pub paternal: Gamete,
}

impl Diplotype {
    pub fn new(maternal: Gamete, paternal: Gamete) -> Self {
        Self { maternal, paternal }
    }

    /// Two copies of the same gamete.
    pub fn homozygous(gamete: Gamete) -> Self {
        Self {
            maternal: gamete,
            paternal: gamete,
        }
    }

    #[inline]
    pub fn maternal(&self) -> &Gamete {
        &self.maternal
    }

    #[inline]
    pub fn paternal(&self) -> &Gamete {
        &self.paternal
    }

    /// Form a gamete by segregation and recombination using `rho` in place of
    /// the record's own rates, then mutate it.
    ///
    /// `rho[0]` is the probability that locus 0 is taken from the maternal
    /// gamete; `rho[i]` is the probability of switching source between loci
    /// `i - 1` and `i`.
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
        let mut gamete = Gamete::default();
        let mut maternal = rng.r#gen::<f64>() < rho[0];
        gamete[0] = self.source(maternal)[0];
        for locus in 1..NUM_LOCI {
            if rng.r#gen::<f64>() < rho[locus] {
                maternal = !maternal;
            }
            gamete[locus] = self.source(maternal)[locus];
        }
        gamete.mutate(params, rng);
        gamete
    }

    #[inline]
    fn source(&self, maternal: bool) -> &Gamete {
        if maternal {
            &self.maternal
        } else {
            &self.paternal
        }
    }
}

impl Genotype for Diplotype {
    fn value(&self) -> LocusArray {
        let mut value = self.maternal.alleles;
        for (v, p) in value.iter_mut().zip(self.paternal.alleles.iter()) {
            *v += p;
        }
        value
    }

    fn gamete<S, R>(&self, params: &MutationParams<S>, rng: &mut R) -> Gamete
    where
        S: MutationShape,
        R: Rng + ?Sized,
    {
        self.gamete_with_rho(params, &params.rho, rng)
    }

    fn column_heads() -> String {
        let maternal = (1..=NUM_LOCI).map(|l| format!("Mat{l}"));
        let paternal = (1..=NUM_LOCI).map(|l| format!("Pat{l}"));
        maternal.chain(paternal).collect::<Vec<_>>().join("\t")
    }
}

impl fmt::Display for Diplotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.maternal, self.paternal)
    }
}

/// A single gamete, transmitted whole apart from mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Haplotype {
    pub gamete: Gamete,
}

impl Haplotype {
    pub fn new(gamete: Gamete) -> Self {
        Self { gamete }
    }
}

impl Genotype for Haplotype {
    fn value(&self) -> LocusArray {
        self.gamete.alleles
    }

    fn gamete<S, R>(&self, params: &MutationParams<S>, rng: &mut R) -> Gamete
    where
        S: MutationShape,
        R: Rng + ?Sized,
    {
        let mut gamete = self.gamete;
        gamete.mutate(params, rng);
        gamete
    }

    fn column_heads() -> String {
        (1..=NUM_LOCI)
            .map(|l| format!("Loc{l}"))
            .collect::<Vec<_>>()
            .join("\t")
    }
}

impl fmt::Display for Haplotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.gamete, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::genetics::{Gaussian, Laplace, Rectangular};
    use rand::RngCore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn parents() -> Diplotype {
        Diplotype::new(Gamete::new([1.0, 2.0, 3.0]), Gamete::new([-1.0, -2.0, -3.0]))
    }

    #[test]
    fn test_value_is_sum_of_gametes() {
        let d = Diplotype::new(
            Gamete::new([0.1, 0.2, -0.3]),
            Gamete::new([0.4, -0.1, 0.3]),
        );
        let value = d.value();
        for locus in 0..NUM_LOCI {
            assert_eq!(value[locus], d.maternal()[locus] + d.paternal()[locus]);
        }
    }

    #[test]
    fn test_draw_sequence_all_low() {
        // every uniform draw is 0.0: maternal at locus 0, then a switch at
        // every following locus
        let params = MutationParams::neutral(Gaussian);
        let mut rng = StepRng::new(0, 0);
        let gamete = parents().gamete(&params, &mut rng);
        assert_eq!(gamete.alleles, [1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_draw_sequence_all_high() {
        // every draw is just below 1.0: paternal at locus 0, never a switch
        let params = MutationParams::neutral(Gaussian);
        let mut rng = StepRng::new(u64::MAX, 0);
        let gamete = parents().gamete(&params, &mut rng);
        assert_eq!(gamete.alleles, [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_draw_sequence_alternating() {
        // draws 0.0, 0.5, 0.0: maternal, no switch (0.5 is not below 0.5), switch
        let params = MutationParams::neutral(Gaussian);
        let mut rng = StepRng::new(0, 1 << 63);
        let gamete = parents().gamete(&params, &mut rng);
        assert_eq!(gamete.alleles, [1.0, 2.0, -3.0]);
    }

    #[test]
    fn test_segregation_consumes_one_draw_per_locus() {
        let params = MutationParams::neutral(Gaussian);
        let mut rng = StepRng::new(0, 1);
        parents().gamete(&params, &mut rng);
        assert_eq!(rng.next_u64(), NUM_LOCI as u64);
    }

    #[test]
    fn test_explicit_rho_overrides_record() {
        let params = MutationParams::neutral(Gaussian).with_uniform_rho(0.5);
        let mut rng = StdRng::seed_from_u64(17);
        let d = parents();
        for _ in 0..50 {
            assert_eq!(
                d.gamete_with_rho(&params, &[1.0, 0.0, 0.0], &mut rng),
                d.maternal
            );
            assert_eq!(
                d.gamete_with_rho(&params, &[0.0, 0.0, 0.0], &mut rng),
                d.paternal
            );
        }
    }

    #[test]
    fn test_same_seed_same_gametes() {
        let params = MutationParams::neutral(Rectangular).with_uniform_rate(0.5);
        let d = parents();
        let mut a = StdRng::seed_from_u64(2024);
        let mut b = StdRng::seed_from_u64(2024);
        let first: Vec<Gamete> = (0..100).map(|_| d.gamete(&params, &mut a)).collect();
        let second: Vec<Gamete> = (0..100).map(|_| d.gamete(&params, &mut b)).collect();
        assert_eq!(first, second);
    }

    /// Recorded gametes of a heterozygote with mutation possible at every
    /// locus, followed by the next raw draw of the generator.
    fn recorded_gametes<S: MutationShape>(shape: S) -> (Vec<LocusArray>, u64) {
        let params = MutationParams {
            shape,
            rate: [0.5; NUM_LOCI],
            sd: [0.1; NUM_LOCI],
            max: [2.0, 2.0, 1.0],
            min: [-2.0, -2.0, -1.0],
            rho: [0.5; NUM_LOCI],
        };
        let d = Diplotype::new(
            Gamete::new([0.5, 1.0, 0.25]),
            Gamete::new([-0.5, -1.0, -0.25]),
        );
        let mut rng = StdRng::seed_from_u64(2024);
        let gametes = (0..4).map(|_| d.gamete(&params, &mut rng).alleles).collect();
        (gametes, rng.next_u64())
    }

    #[test]
    fn test_recorded_gametes_rectangular() {
        let (gametes, next) = recorded_gametes(Rectangular);
        assert_eq!(
            gametes,
            vec![
                [-0.6079197369810557, -1.0726894164971845, -0.3180755515200697],
                [-0.5, -1.0, -0.33180965303243987],
                [-0.5, -1.0, 0.12980858443836046],
                [-0.5, -1.0, 0.23775115361850135],
            ]
        );
        assert_eq!(next, 7090940414739223234);
    }

    #[test]
    fn test_recorded_gametes_gaussian() {
        let (gametes, next) = recorded_gametes(Gaussian);
        assert_eq!(
            gametes,
            vec![
                [-0.5561375040644029, -1.1184684132368699, -0.29622035619198683],
                [-0.5, -1.0, -0.3930133331543455],
                [-0.5, -1.0, 0.19208807909500436],
                [-0.5, -1.0, 0.23743706557985922],
            ]
        );
        assert_eq!(next, 7090940414739223234);
    }

    #[test]
    fn test_recorded_gametes_laplace() {
        let (gametes, next) = recorded_gametes(Laplace);
        assert_eq!(
            gametes,
            vec![
                [-0.47833920748185255, -0.9770928421829426, -0.25],
                [-0.5, -0.8557516469363152, -0.25],
                [0.6009683197609177, 1.0, 0.16222893158257495],
                [0.6362166282197217, -1.0, 0.2392850239727592],
            ]
        );
        assert_eq!(next, 7895660159080679510);
    }

    #[test]
    fn test_mendelian_segregation_frequency() {
        let params = MutationParams::neutral(Gaussian);
        let mut rng = StdRng::seed_from_u64(8);
        let d = parents();
        let n = 20_000;
        let maternal_first = (0..n)
            .filter(|_| d.gamete(&params, &mut rng)[0] > 0.0)
            .count();
        let freq = maternal_first as f64 / n as f64;
        assert!((freq - 0.5).abs() < 0.02, "frequency {freq}");
    }

    #[test]
    fn test_haplotype_transmits_whole_gamete() {
        let params = MutationParams::neutral(Gaussian);
        let mut rng = StdRng::seed_from_u64(4);
        let h = Haplotype::new(Gamete::new([0.5, 0.25, -0.5]));
        assert_eq!(h.gamete(&params, &mut rng), h.gamete);
        assert_eq!(h.value(), [0.5, 0.25, -0.5]);
    }

    #[test]
    fn test_column_heads() {
        assert_eq!(Diplotype::column_heads(), "Mat1\tMat2\tMat3\tPat1\tPat2\tPat3");
        assert_eq!(Haplotype::column_heads(), "Loc1\tLoc2\tLoc3");
    }
}
