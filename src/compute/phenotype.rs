//! Expressed learning state derived from a genotype.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::genetics::Genotype;
use crate::schema::LocusArray;

/// Column headers of the phenotype's text form, in field order.
pub const PHENOTYPE_COLUMNS: [&str; 16] = [
    "w0", "theta0", "d", "q", "p", "w", "R", "theta", "a", "payoff", "delta", "elig", "ztheta",
    "gnum", "inum", "female",
];

/// Genotypic traits `(w0, theta0, d)` together with the actor-critic state
/// reached during a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    /// Estimated reward at the start of a generation.
    pub w0: f64,
    /// Mean action (investment) at the start of a generation.
    pub theta0: f64,
    /// Perception bias, the difference `p - q`.
    pub d: f64,
    /// Real quality.
    pub q: f64,
    /// Perceived quality.
    pub p: f64,
    /// Critic's reward estimate.
    pub w: f64,
    /// Most recent subjective reward.
    pub reward: f64,
    /// Policy mean.
    pub theta: f64,
    /// Most recent action.
    pub action: f64,
    /// Payoff, accumulated during interaction and then averaged per round.
    pub payoff: f64,
    /// Most recent TD error.
    pub delta: f64,
    /// Most recent eligibility signal.
    pub elig: f64,
    /// Eligibility trace of the policy mean.
    pub ztheta: f64,
    /// Interaction group number.
    pub group: usize,
    /// Individual number within the group.
    pub member: usize,
    /// Sex; carried along but unused by the game.
    pub female: bool,
}

impl Default for Phenotype {
    fn default() -> Self {
        Self::from_value([0.0; 3], true)
    }
}

impl Phenotype {
    /// Express a genotype at the start of a generation.
    pub fn from_genotype<G: Genotype>(genotype: &G, female: bool) -> Self {
        Self::from_value(genotype.value(), female)
    }

    /// Start-of-generation state from trait values `(w0, theta0, d)`.
    pub fn from_value(value: LocusArray, female: bool) -> Self {
        let [w0, theta0, d] = value;
        let q = 1.0;
        Self {
            w0,
            theta0,
            d,
            q,
            p: q + d,
            w: w0,
            reward: 0.0,
            theta: theta0,
            action: 0.0,
            payoff: 0.0,
            delta: 0.0,
            elig: 0.0,
            ztheta: 0.0,
            group: 0,
            member: 0,
            female,
        }
    }

    /// Re-express a genotype, discarding all learning state.
    pub fn assign<G: Genotype>(&mut self, genotype: &G, female: bool) {
        *self = Self::from_genotype(genotype, female);
    }

    /// Set real quality; perceived quality follows as `q + d`.
    #[inline]
    pub fn set_quality(&mut self, q: f64) {
        self.q = q;
        self.p = q + self.d;
    }

    /// The thirteen real-valued fields in column order.
    pub fn real_fields(&self) -> [f64; 13] {
        [
            self.w0,
            self.theta0,
            self.d,
            self.q,
            self.p,
            self.w,
            self.reward,
            self.theta,
            self.action,
            self.payoff,
            self.delta,
            self.elig,
            self.ztheta,
        ]
    }

    /// Rebuild from the real-valued fields in column order plus the tags.
    pub fn from_fields(real: [f64; 13], group: usize, member: usize, female: bool) -> Self {
        let [w0, theta0, d, q, p, w, reward, theta, action, payoff, delta, elig, ztheta] = real;
        Self {
            w0,
            theta0,
            d,
            q,
            p,
            w,
            reward,
            theta,
            action,
            payoff,
            delta,
            elig,
            ztheta,
            group,
            member,
            female,
        }
    }

    pub fn column_heads() -> String {
        PHENOTYPE_COLUMNS.join("\t")
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.real_fields() {
            write!(f, "{value}\t")?;
        }
        write!(
            f,
            "{}\t{}\t{}",
            self.group,
            self.member,
            u8::from(self.female)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::genetics::{Diplotype, Gamete, Haplotype};

    #[test]
    fn test_assign_from_diplotype() {
        let genotype = Diplotype::new(
            Gamete::new([0.1, 0.2, 0.05]),
            Gamete::new([0.3, 0.1, 0.05]),
        );
        let ph = Phenotype::from_genotype(&genotype, false);
        assert!((ph.w0 - 0.4).abs() < 1e-12);
        assert!((ph.theta0 - 0.3).abs() < 1e-12);
        assert!((ph.d - 0.1).abs() < 1e-12);
        assert_eq!(ph.q, 1.0);
        assert_eq!(ph.p, ph.q + ph.d);
        assert_eq!(ph.w, ph.w0);
        assert_eq!(ph.theta, ph.theta0);
        assert_eq!(ph.payoff, 0.0);
        assert_eq!(ph.ztheta, 0.0);
        assert_eq!((ph.group, ph.member), (0, 0));
        assert!(!ph.female);
    }

    #[test]
    fn test_assign_resets_learning_state() {
        let genotype = Haplotype::new(Gamete::new([0.5, 1.0, -0.25]));
        let mut ph = Phenotype::from_genotype(&genotype, true);
        ph.theta = 9.0;
        ph.payoff = 3.0;
        ph.group = 4;
        ph.assign(&genotype, true);
        assert_eq!(ph, Phenotype::from_value([0.5, 1.0, -0.25], true));
    }

    #[test]
    fn test_set_quality_keeps_perception_bias() {
        let mut ph = Phenotype::from_value([0.0, 0.0, -0.3], true);
        for q in [0.5, 1.0, 1.5] {
            ph.set_quality(q);
            assert_eq!(ph.p, q + ph.d);
        }
    }

    #[test]
    fn test_display_field_order() {
        let mut ph = Phenotype::from_value([1.0, 2.0, 0.5], true);
        ph.group = 3;
        ph.member = 2;
        assert_eq!(
            ph.to_string(),
            "1\t2\t0.5\t1\t1.5\t1\t0\t2\t0\t0\t0\t0\t0\t3\t2\t1"
        );
        assert_eq!(Phenotype::column_heads().split('\t').count(), 16);
    }

    #[test]
    fn test_fields_roundtrip() {
        let mut ph = Phenotype::from_value([0.1, 0.2, 0.3], false);
        ph.payoff = -0.75;
        ph.group = 7;
        let back = Phenotype::from_fields(ph.real_fields(), ph.group, ph.member, ph.female);
        assert_eq!(back, ph);
    }
}
