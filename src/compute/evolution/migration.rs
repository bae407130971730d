//! Global mixing of offspring across subpopulations between generations.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::compute::population::{Metapopulation, PopulationContainer};

/// Redistribute all offspring in `next` over the slots of `current`.
///
/// A uniformly random permutation of the `nsp * groups * group_size` slot
/// positions is drawn in one shuffle. Destination slots are filled in order
/// (subpopulation, then group, then member); each takes the offspring at the
/// next permuted source position and gets new subpopulation, group and member
/// tags, the latter two 1-based. Every offspring is placed exactly once.
pub fn migrate<R: Rng + ?Sized>(
    current: &mut Metapopulation,
    next: &Metapopulation,
    groups: usize,
    group_size: usize,
    rng: &mut R,
) {
    let capacity = groups * group_size;
    let total = current.len() * capacity;
    let mut order: Vec<usize> = (0..total).collect();
    order.shuffle(rng);

    let mut sources = order.into_iter();
    for (spn, sp) in current.iter_mut().enumerate() {
        sp.clear();
        for group in 1..=groups {
            for member in 1..=group_size {
                let Some(n) = sources.next() else {
                    return;
                };
                let Some(source) = next
                    .as_slice()
                    .get(n / capacity)
                    .and_then(|origin| origin.as_slice().get(n % capacity))
                else {
                    continue;
                };
                let mut ind = source.clone();
                ind.subpopulation = spn;
                ind.phenotype.group = group;
                ind.phenotype.member = member;
                sp.add(ind);
            }
        }
    }
}
