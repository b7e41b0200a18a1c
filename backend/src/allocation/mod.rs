//! Producer Allocation Engine
//!
//! This module assigns producers to distributors whose allocation went stale.
//!
//! # Allocation Flow
//!
//! ```text
//! stale distributor
//!   ├─ leave every producer it was drawing from (this turn only)
//!   ├─ rank all producers with its strategy
//!   └─ walk the ranking, skipping full producers,
//!      taking producers until the energy need is covered
//! ```
//!
//! Running out of producers before the need is covered is not an error: the
//! distributor is simply under-supplied until its next reallocation.
//!
//! # Critical Invariants
//!
//! - **Capacity**: a producer never serves more than `max_distributors` at a turn
//! - **Scope**: only the set of the current turn is touched; history is kept
//! - **Determinism**: rankings are total orders, so the outcome depends only on
//!   the state, never on the previous order of the producer list

use crate::models::state::MarketState;
use crate::models::EntityId;

/// Outcome of one distributor's reallocation
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub distributor_id: EntityId,

    /// Producers picked, in ranking order
    pub producer_ids: Vec<EntityId>,

    /// Sum of energy per distributor over the picked producers
    pub energy_supplied: i64,

    pub energy_needed: i64,

    /// Production cost recomputed from the new producers
    pub production_cost: i64,
}

impl Allocation {
    pub fn is_under_supplied(&self) -> bool {
        self.energy_supplied < self.energy_needed
    }
}

/// Reallocate producers for every distributor flagged `producer_changed`
///
/// Distributors are handled in market order, so an earlier distributor may
/// fill a producer that a later one would have preferred.
///
/// # Arguments
///
/// * `state` - Market state (distributors and producers are mutated)
/// * `turn` - Current turn; producer sets of this turn are updated
///
/// # Returns
///
/// One `Allocation` per reallocated distributor, in market order
///
/// # Example
///
/// ```rust
/// use energy_market_core_rs::allocation::reallocate_producers;
/// use energy_market_core_rs::{Distributor, EnergyChoiceStrategy, EnergyType, MarketState, Producer};
///
/// let mut state = MarketState::new(
///     vec![],
///     vec![Distributor::new(1, 3, 100, 10, 150, EnergyChoiceStrategy::Quantity)],
///     vec![
///         Producer::new(10, EnergyType::Coal, 1, 1.0, 100, 1),
///         Producer::new(11, EnergyType::Wind, 1, 1.0, 80, 1),
///         Producer::new(12, EnergyType::Solar, 1, 1.0, 20, 1),
///     ],
/// );
///
/// let allocations = reallocate_producers(&mut state, 0);
/// assert_eq!(allocations[0].producer_ids, vec![10, 11]);
/// assert_eq!(allocations[0].production_cost, 18);
/// ```
pub fn reallocate_producers(state: &mut MarketState, turn: usize) -> Vec<Allocation> {
    let (distributors, producers) = state.distributors_and_producers_mut();
    let mut allocations = Vec::new();

    for distributor in distributors.iter_mut().filter(|d| d.producer_changed()) {
        let distributor_id = distributor.id();

        for producer_id in distributor.release_producers() {
            if let Some(producer) = producers.iter_mut().find(|p| p.id() == producer_id) {
                producer.remove_distributor(distributor_id, turn);
            }
        }

        distributor.strategy().sort_producers(producers);

        let energy_needed = distributor.energy_needed_kw();
        let mut energy_supplied = 0;
        let mut producer_ids = Vec::new();

        for producer in producers.iter_mut() {
            if energy_supplied >= energy_needed {
                break;
            }
            if producer.is_full(turn) {
                continue;
            }

            producer.add_distributor(distributor_id, turn);
            distributor.assign_producer(producer.id());
            producer_ids.push(producer.id());
            energy_supplied += producer.energy_per_distributor();
        }

        distributor.update_production_cost(
            producers
                .iter()
                .filter(|p| producer_ids.contains(&p.id())),
        );

        allocations.push(Allocation {
            distributor_id,
            producer_ids,
            energy_supplied,
            energy_needed,
            production_cost: distributor.production_cost(),
        });
    }

    allocations
}
