//! Haploid sets of allelic values.

use std::fmt;
use std::ops::{Index, IndexMut};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mutation::{MutationParams, MutationShape};
use crate::schema::{LocusArray, NUM_LOCI};

/// One allele per locus; each locus codes for a separate one-dimensional trait.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gamete {
    pub alleles: LocusArray,
}

impl Gamete {
    pub fn new(alleles: LocusArray) -> Self {
        Self { alleles }
    }

    #[inline]
    pub fn value(&self) -> &LocusArray {
        &self.alleles
    }

    #[inline]
    pub fn len(&self) -> usize {
        NUM_LOCI
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        NUM_LOCI == 0
    }

    /// Mutate each locus independently with its own rate, then clamp the
    /// allele to that locus' bounds.
    pub fn mutate<S, R>(&mut self, params: &MutationParams<S>, rng: &mut R)
    where
        S: MutationShape,
        R: Rng + ?Sized,
    {
        for (i, allele) in self.alleles.iter_mut().enumerate() {
            if params.rate[i] > 0.0 && rng.r#gen::<f64>() < params.rate[i] {
                // SD[i]^2 is the variance of the increment
                *allele += params.sd[i] * params.std_incr(rng);
                if *allele > params.max[i] {
                    *allele = params.max[i];
                } else if *allele < params.min[i] {
                    *allele = params.min[i];
                }
            }
        }
    }
}

impl Index<usize> for Gamete {
    type Output = f64;

    fn index(&self, locus: usize) -> &f64 {
        &self.alleles[locus]
    }
}

impl IndexMut<usize> for Gamete {
    fn index_mut(&mut self, locus: usize) -> &mut f64 {
        &mut self.alleles[locus]
    }
}

impl fmt::Display for Gamete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, allele) in self.alleles.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{allele}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::genetics::{Gaussian, Laplace, Rectangular};
    use proptest::prelude::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounded(shape_sd: f64) -> MutationParams<Gaussian> {
        MutationParams {
            shape: Gaussian,
            rate: [1.0; NUM_LOCI],
            sd: [shape_sd; NUM_LOCI],
            max: [1.0, 0.5, 0.0],
            min: [-1.0, -0.5, -0.25],
            rho: [0.5; NUM_LOCI],
        }
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let params = MutationParams::neutral(Laplace).with_uniform_rate(0.0);
        let mut rng = StdRng::seed_from_u64(5);
        let original = Gamete::new([0.3, -7.0, 12.5]);
        let mut gamete = original;
        for _ in 0..100 {
            gamete.mutate(&params, &mut rng);
        }
        assert_eq!(gamete, original);
    }

    #[test]
    fn test_zero_rate_consumes_no_draws() {
        let params = MutationParams::neutral(Rectangular);
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        Gamete::new([1.0, 2.0, 3.0]).mutate(&params, &mut a);
        assert_eq!(a.r#gen::<u64>(), b.r#gen::<u64>());
    }

    #[test]
    fn test_certain_mutation_changes_alleles() {
        let params = MutationParams {
            sd: [0.1; NUM_LOCI],
            ..MutationParams::neutral(Gaussian).with_uniform_rate(1.0)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut gamete = Gamete::default();
        gamete.mutate(&params, &mut rng);
        assert!(gamete.alleles.iter().all(|a| *a != 0.0));
    }

    #[test]
    fn test_display_is_tab_separated() {
        let gamete = Gamete::new([0.5, -1.0, 2.0]);
        assert_eq!(gamete.to_string(), "0.5\t-1\t2");
    }

    proptest! {
        #[test]
        fn mutation_stays_within_bounds(
            seed in any::<u64>(),
            start in prop::array::uniform3(-5.0f64..5.0),
            sd in 0.0f64..1e6,
        ) {
            let params = bounded(sd);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut gamete = Gamete::new(start);
            gamete.mutate(&params, &mut rng);
            for i in 0..NUM_LOCI {
                prop_assert!(gamete[i] >= params.min[i] && gamete[i] <= params.max[i]);
            }
        }
    }
}
