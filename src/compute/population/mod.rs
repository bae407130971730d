//! Population containers.
//!
//! A [`Metapopulation`] is an ordered collection of subpopulation containers
//! that share one capacity. Several container variants exist:
//!
//! - [`SubPopulation`]: append-only; rebuilt from scratch every generation.
//!   This is what the simulation uses.
//! - [`SlotPopulation`]: a fixed arena of slots with a stack of free indices,
//!   supporting removal and reuse of slots within a generation.
//! - [`SexedSlotPopulation`]: as above, also counting females and males.
//!
//! [`LivingIndex`] and [`SexedLivingIndex`] are dense views of the occupied
//! slots of a slot container, with O(1) removal of a dead entry.

mod metapop;
mod records;
mod slots;
mod subpop;

pub use metapop::Metapopulation;
pub use records::{POPULATION_FIELDS, PopulationFileError};
pub use slots::{LivingIndex, SexedLivingIndex, SexedSlotPopulation, SlotPopulation};
pub use subpop::SubPopulation;

use super::individual::Individual;

/// Common interface of subpopulation containers.
///
/// `add` beyond capacity is a silent no-op; callers guarantee they never
/// attempt it.
pub trait PopulationContainer: Clone + Send + Sync {
    /// An empty container with room for `capacity` individuals.
    fn with_capacity(capacity: usize) -> Self;

    fn capacity(&self) -> usize;

    /// Number of occupied slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Insert an individual, marking it alive. Ignored when full.
    fn add(&mut self, individual: Individual);

    /// Remove every individual without changing capacity.
    fn clear(&mut self);

    /// Occupied slots in slot order.
    fn alive(&self) -> impl Iterator<Item = &Individual>;

    /// Subpopulation number.
    fn id(&self) -> usize;

    fn set_id(&mut self, id: usize);
}
