//! Market State
//!
//! Represents the complete state of the energy market during a run.
//! Contains all consumers, distributors and producers, the contract book and
//! the terminal collections of bankrupt players.
//!
//! # Critical Invariants
//!
//! 1. **Single owner**: every contract lives in the contract book; consumers
//!    and distributors only hold its ID
//! 2. **No orphans**: a contract stays in the book while at least one side
//!    references it and is destroyed once both sides dropped it
//! 3. **Frozen bankrupts**: bankrupt players are never mutated again and hold
//!    no contracts or producer slots once purged
//! 4. **Stable order**: every sweep walks the collections in insertion order

use crate::models::consumer::{Consumer, LeaseOutcome};
use crate::models::contract::{Contract, ContractId};
use crate::models::distributor::Distributor;
use crate::models::producer::Producer;
use crate::models::EntityId;
use std::collections::{BTreeMap, BTreeSet};

/// Complete market state
///
/// # Example
///
/// ```rust
/// use energy_market_core_rs::{Consumer, Distributor, EnergyChoiceStrategy, MarketState};
///
/// let mut state = MarketState::new(
///     vec![Consumer::new(1, 100, 10)],
///     vec![Distributor::new(7, 3, 1000, 20, 0, EnergyChoiceStrategy::Price)],
///     vec![],
/// );
/// state.update_contract_costs();
///
/// let signed = state.sign_contracts();
/// assert_eq!(signed.len(), 1);
/// assert_eq!(state.num_contracts(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MarketState {
    consumers: Vec<Consumer>,
    distributors: Vec<Distributor>,
    producers: Vec<Producer>,

    /// All live contracts, indexed by contract ID
    contracts: BTreeMap<ContractId, Contract>,

    bankrupt_consumers: Vec<Consumer>,
    bankrupt_distributors: Vec<Distributor>,

    /// Counter for generating unique contract IDs
    next_contract_id: ContractId,
}

impl MarketState {
    /// Create a new market with the given players and no contracts
    pub fn new(
        consumers: Vec<Consumer>,
        distributors: Vec<Distributor>,
        producers: Vec<Producer>,
    ) -> Self {
        Self {
            consumers,
            distributors,
            producers,
            contracts: BTreeMap::new(),
            bankrupt_consumers: Vec::new(),
            bankrupt_distributors: Vec::new(),
            next_contract_id: 1,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Active (non-bankrupt) consumers, in insertion order
    pub fn consumers(&self) -> &[Consumer] {
        &self.consumers
    }

    /// Active (non-bankrupt) distributors, in insertion order
    pub fn distributors(&self) -> &[Distributor] {
        &self.distributors
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    pub fn bankrupt_consumers(&self) -> &[Consumer] {
        &self.bankrupt_consumers
    }

    pub fn bankrupt_distributors(&self) -> &[Distributor] {
        &self.bankrupt_distributors
    }

    pub fn contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.get(&id)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    pub fn num_contracts(&self) -> usize {
        self.contracts.len()
    }

    /// Active consumer by ID
    pub fn get_consumer(&self, id: EntityId) -> Option<&Consumer> {
        self.consumers.iter().find(|c| c.id() == id)
    }

    /// Active distributor by ID
    pub fn get_distributor(&self, id: EntityId) -> Option<&Distributor> {
        self.distributors.iter().find(|d| d.id() == id)
    }

    pub fn get_distributor_mut(&mut self, id: EntityId) -> Option<&mut Distributor> {
        self.distributors.iter_mut().find(|d| d.id() == id)
    }

    pub fn get_producer(&self, id: EntityId) -> Option<&Producer> {
        self.producers.iter().find(|p| p.id() == id)
    }

    pub fn get_producer_mut(&mut self, id: EntityId) -> Option<&mut Producer> {
        self.producers.iter_mut().find(|p| p.id() == id)
    }

    /// Mutable distributors and producers at once (allocation needs both)
    pub(crate) fn distributors_and_producers_mut(
        &mut self,
    ) -> (&mut [Distributor], &mut [Producer]) {
        (&mut self.distributors, &mut self.producers)
    }

    pub(crate) fn distributors_mut(&mut self) -> &mut [Distributor] {
        &mut self.distributors
    }

    /// Whether any consumer, active or bankrupt, already uses this ID
    pub fn has_consumer_id(&self, id: EntityId) -> bool {
        self.consumers
            .iter()
            .chain(self.bankrupt_consumers.iter())
            .any(|c| c.id() == id)
    }

    /// Add a consumer joining mid-run
    ///
    /// Returns false (and leaves the state untouched) if the ID is taken.
    pub fn add_consumer(&mut self, consumer: Consumer) -> bool {
        if self.has_consumer_id(consumer.id()) {
            return false;
        }
        self.consumers.push(consumer);
        true
    }

    // ========================================================================
    // Turn Sweeps
    // ========================================================================

    /// Recompute every active distributor's contract cost
    pub fn update_contract_costs(&mut self) {
        for distributor in &mut self.distributors {
            distributor.update_contract_cost();
        }
    }

    /// Carry every producer's assignments into `turn`
    ///
    /// Distributors already moved to the bankrupt collection are dropped, so
    /// they stop occupying producer slots from `turn` on.
    pub fn carry_forward_assignments(&mut self, turn: usize) {
        let departed: BTreeSet<EntityId> =
            self.bankrupt_distributors.iter().map(Distributor::id).collect();

        for producer in &mut self.producers {
            producer.carry_forward(turn, &departed);
        }
    }

    /// Distributor offering the lowest contract cost, lowest ID on ties
    pub fn cheapest_distributor(&self) -> Option<&Distributor> {
        self.cheapest_distributor_index()
            .map(|index| &self.distributors[index])
    }

    fn cheapest_distributor_index(&self) -> Option<usize> {
        self.distributors
            .iter()
            .enumerate()
            .min_by_key(|(_, d)| (d.contract_cost(), d.id()))
            .map(|(index, _)| index)
    }

    /// Sign every consumer lacking a contract with the cheapest distributor
    ///
    /// Returns the IDs of the new contracts, in signing order. No-op when
    /// there are no distributors.
    pub fn sign_contracts(&mut self) -> Vec<ContractId> {
        let Some(index) = self.cheapest_distributor_index() else {
            return Vec::new();
        };

        let distributor = &mut self.distributors[index];
        let mut signed = Vec::new();

        for consumer in self.consumers.iter_mut().filter(|c| !c.has_contract()) {
            let id = self.next_contract_id;
            self.next_contract_id += 1;

            let contract = Contract::new(
                id,
                distributor.id(),
                consumer.id(),
                distributor.contract_cost(),
                distributor.contract_length(),
            );
            self.contracts.insert(id, contract);
            consumer.sign_contract(id);
            distributor.sign_contract(id);
            signed.push(id);
        }

        signed
    }

    /// Credit income and collect the lease of every active consumer
    pub fn advance_consumers(&mut self) -> Vec<(EntityId, LeaseOutcome)> {
        let mut outcomes = Vec::with_capacity(self.consumers.len());

        for consumer in &mut self.consumers {
            consumer.advance_budget();
            let contract = match consumer.contract_id() {
                Some(id) => self.contracts.get_mut(&id),
                None => None,
            };
            outcomes.push((consumer.id(), consumer.advance_lease(contract)));
        }

        outcomes
    }

    /// Charge costs and collect leases of every active distributor
    ///
    /// Returns the IDs of distributors that went bankrupt.
    pub fn advance_distributors(&mut self) -> Vec<EntityId> {
        let contracts = &mut self.contracts;
        let mut bankrupt = Vec::new();

        for distributor in &mut self.distributors {
            distributor.advance_budget();

            let own: BTreeSet<ContractId> = distributor.contract_ids().iter().copied().collect();
            let leases = contracts
                .iter_mut()
                .filter(|(id, _)| own.contains(*id))
                .map(|(_, contract)| contract);

            if distributor.advance_lease(leases) {
                bankrupt.push(distributor.id());
            }
        }

        bankrupt
    }

    /// Drop fully paid contracts from both sides and destroy them
    pub fn purge_paid_contracts(&mut self) -> Vec<Contract> {
        let contracts = &self.contracts;

        for consumer in &mut self.consumers {
            if let Some(contract) = consumer.contract_id().and_then(|id| contracts.get(&id)) {
                consumer.purge_paid_contract(contract);
            }
        }
        for distributor in &mut self.distributors {
            distributor.drop_contracts_where(|id| contracts.get(&id).is_some_and(Contract::is_paid));
        }

        self.collect_unreferenced()
    }

    /// Drop cancelled contracts from both sides and destroy them
    ///
    /// A bankrupt distributor drops every contract, including one its consumer
    /// finished paying in the same month.
    pub fn purge_cancelled_contracts(&mut self) -> Vec<Contract> {
        let contracts = &self.contracts;

        for consumer in &mut self.consumers {
            if let Some(contract) = consumer.contract_id().and_then(|id| contracts.get(&id)) {
                consumer.purge_cancelled_contract(contract);
            }
        }
        for distributor in &mut self.distributors {
            let bankrupt = distributor.is_bankrupt();
            distributor.drop_contracts_where(|id| {
                bankrupt || contracts.get(&id).is_some_and(Contract::is_cancelled)
            });
        }

        self.collect_unreferenced()
    }

    /// Move bankrupt players into the terminal collections
    ///
    /// Returns the IDs of the purged consumers and distributors.
    pub fn purge_bankrupt_players(&mut self) -> (Vec<EntityId>, Vec<EntityId>) {
        let (bankrupt, active): (Vec<Consumer>, Vec<Consumer>) =
            std::mem::take(&mut self.consumers)
                .into_iter()
                .partition(Consumer::is_bankrupt);
        self.consumers = active;
        let consumer_ids = bankrupt.iter().map(Consumer::id).collect();
        self.bankrupt_consumers.extend(bankrupt);

        let (bankrupt, active): (Vec<Distributor>, Vec<Distributor>) =
            std::mem::take(&mut self.distributors)
                .into_iter()
                .partition(Distributor::is_bankrupt);
        self.distributors = active;
        let distributor_ids = bankrupt.iter().map(Distributor::id).collect();
        self.bankrupt_distributors.extend(bankrupt);

        (consumer_ids, distributor_ids)
    }

    /// Destroy contracts no active player references anymore
    fn collect_unreferenced(&mut self) -> Vec<Contract> {
        let referenced: BTreeSet<ContractId> = self
            .consumers
            .iter()
            .filter_map(Consumer::contract_id)
            .chain(
                self.distributors
                    .iter()
                    .flat_map(|d| d.contract_ids().iter().copied()),
            )
            .collect();

        let (kept, destroyed): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut self.contracts)
                .into_iter()
                .partition(|(id, _)| referenced.contains(id));
        self.contracts = kept;
        destroyed.into_values().collect()
    }

    // ========================================================================
    // Final Collections
    // ========================================================================

    /// Active and bankrupt consumers merged, ascending by ID
    pub fn all_consumers_sorted(&self) -> Vec<&Consumer> {
        let mut all: Vec<&Consumer> = self
            .consumers
            .iter()
            .chain(self.bankrupt_consumers.iter())
            .collect();
        all.sort_by_key(|c| c.id());
        all
    }

    /// Active and bankrupt distributors merged, ascending by ID
    pub fn all_distributors_sorted(&self) -> Vec<&Distributor> {
        let mut all: Vec<&Distributor> = self
            .distributors
            .iter()
            .chain(self.bankrupt_distributors.iter())
            .collect();
        all.sort_by_key(|d| d.id());
        all
    }

    /// Producers ascending by ID
    pub fn producers_sorted(&self) -> Vec<&Producer> {
        let mut all: Vec<&Producer> = self.producers.iter().collect();
        all.sort_by_key(|p| p.id());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::EnergyChoiceStrategy;

    fn distributor(id: EntityId, infrastructure_cost: i64) -> Distributor {
        Distributor::new(id, 2, 1_000, infrastructure_cost, 0, EnergyChoiceStrategy::Green)
    }

    #[test]
    fn test_sign_contracts_without_distributors_is_noop() {
        let mut state = MarketState::new(vec![Consumer::new(1, 10, 10)], vec![], vec![]);

        assert!(state.sign_contracts().is_empty());
        assert!(!state.consumers()[0].has_contract());
        assert_eq!(state.num_contracts(), 0);
    }

    #[test]
    fn test_cheapest_distributor_tie_goes_to_lowest_id() {
        let mut state = MarketState::new(
            vec![Consumer::new(1, 10, 10)],
            vec![distributor(9, 50), distributor(4, 50), distributor(6, 80)],
            vec![],
        );
        state.update_contract_costs();

        assert_eq!(state.cheapest_distributor().map(Distributor::id), Some(4));
        state.sign_contracts();
        assert_eq!(state.get_distributor(4).unwrap().contract_ids().len(), 1);
    }

    #[test]
    fn test_add_consumer_rejects_duplicate_id() {
        let mut state = MarketState::new(vec![Consumer::new(1, 10, 10)], vec![], vec![]);

        assert!(!state.add_consumer(Consumer::new(1, 99, 99)));
        assert!(state.add_consumer(Consumer::new(2, 99, 99)));
        assert_eq!(state.consumers().len(), 2);
    }

    #[test]
    fn test_paid_contract_destroyed_after_both_sides_drop_it() {
        let mut state = MarketState::new(
            vec![Consumer::new(1, 100, 0)],
            vec![distributor(2, 10)],
            vec![],
        );
        state.update_contract_costs();
        state.sign_contracts();
        state.advance_consumers();
        state.advance_consumers();

        let purged = state.purge_paid_contracts();

        assert_eq!(purged.len(), 1);
        assert_eq!(state.num_contracts(), 0);
        assert!(!state.consumers()[0].has_contract());
        assert!(state.distributors()[0].contract_ids().is_empty());
    }

    #[test]
    fn test_bankrupt_players_move_to_terminal_collections() {
        let mut state = MarketState::new(
            vec![Consumer::new(1, 0, 0), Consumer::new(2, 100, 0)],
            vec![distributor(3, 40)],
            vec![],
        );
        state.update_contract_costs();
        state.sign_contracts();

        // Consumer 1 misses twice: grace month, then bankruptcy
        state.advance_consumers();
        state.advance_consumers();
        let cancelled = state.purge_cancelled_contracts();
        let (consumers, distributors) = state.purge_bankrupt_players();

        assert_eq!(cancelled.len(), 1);
        assert_eq!(consumers, vec![1]);
        assert!(distributors.is_empty());
        assert_eq!(state.bankrupt_consumers().len(), 1);
        assert_eq!(state.distributors()[0].contract_ids().len(), 1);
    }
}
