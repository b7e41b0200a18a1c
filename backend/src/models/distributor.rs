//! Distributor model
//!
//! Buys energy from producers and leases it to consumers. Each distributor has:
//! - Budget (i64), charged monthly for infrastructure and production
//! - Contract length offered to consumers (months)
//! - Infrastructure cost (updated through change records)
//! - Energy need (kW) covered by its assigned producers
//! - Strategy used to rank producers when reallocating
//! - Derived production cost and contract cost
//! - IDs of signed contracts (signing order) and of assigned producers
//! - `producer_changed` flag marking the allocation stale
//!
//! # Critical Invariants
//!
//! 1. A bankrupt distributor has had every one of its contracts terminated
//! 2. `producer_changed` starts true so the bootstrap turn allocates

use crate::models::contract::{Contract, ContractId};
use crate::models::producer::Producer;
use crate::models::EntityId;
use crate::strategy::EnergyChoiceStrategy;
use serde::{Deserialize, Serialize};

/// Share of the production cost added as profit to the contract cost
const PROFIT_MARGIN: f32 = 0.2;

/// Production cost is quoted per 10 kW of assigned energy
const PRODUCTION_COST_DIVISOR: f64 = 10.0;

/// A distributor in the market
///
/// # Example
/// ```
/// use energy_market_core_rs::{Distributor, EnergyChoiceStrategy};
///
/// let mut distributor = Distributor::new(1, 12, 1000, 300, 500, EnergyChoiceStrategy::Green);
/// distributor.update_contract_cost();
///
/// // No contracts, no producers yet: infrastructure cost only
/// assert_eq!(distributor.contract_cost(), 300);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distributor {
    id: EntityId,
    budget: i64,
    contract_length: i64,
    infrastructure_cost: i64,
    energy_needed_kw: i64,
    strategy: EnergyChoiceStrategy,

    /// Monthly cost of the energy bought from assigned producers
    production_cost: i64,

    /// Price offered to new consumers this turn
    contract_cost: i64,

    /// Signed contracts, in signing order
    contracts: Vec<ContractId>,

    /// Producers currently supplying this distributor (non-owning)
    producers: Vec<EntityId>,

    producer_changed: bool,
    is_bankrupt: bool,
}

impl Distributor {
    /// Create a new distributor without contracts or producers
    ///
    /// # Arguments
    /// * `id` - Distributor ID
    /// * `contract_length` - Length of contracts it signs (months)
    /// * `budget` - Opening budget
    /// * `infrastructure_cost` - Fixed monthly cost
    /// * `energy_needed_kw` - Energy to source from producers
    /// * `strategy` - Producer ranking used when allocating
    pub fn new(
        id: EntityId,
        contract_length: i64,
        budget: i64,
        infrastructure_cost: i64,
        energy_needed_kw: i64,
        strategy: EnergyChoiceStrategy,
    ) -> Self {
        Self {
            id,
            budget,
            contract_length,
            infrastructure_cost,
            energy_needed_kw,
            strategy,
            production_cost: 0,
            contract_cost: 0,
            contracts: Vec::new(),
            producers: Vec::new(),
            producer_changed: true,
            is_bankrupt: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn contract_length(&self) -> i64 {
        self.contract_length
    }

    pub fn infrastructure_cost(&self) -> i64 {
        self.infrastructure_cost
    }

    pub fn energy_needed_kw(&self) -> i64 {
        self.energy_needed_kw
    }

    pub fn strategy(&self) -> EnergyChoiceStrategy {
        self.strategy
    }

    pub fn production_cost(&self) -> i64 {
        self.production_cost
    }

    pub fn contract_cost(&self) -> i64 {
        self.contract_cost
    }

    pub fn is_bankrupt(&self) -> bool {
        self.is_bankrupt
    }

    pub fn producer_changed(&self) -> bool {
        self.producer_changed
    }

    /// Signed contract IDs, in signing order
    pub fn contract_ids(&self) -> &[ContractId] {
        &self.contracts
    }

    /// Assigned producer IDs, in allocation order
    pub fn producer_ids(&self) -> &[EntityId] {
        &self.producers
    }

    pub fn sign_contract(&mut self, contract_id: ContractId) {
        self.contracts.push(contract_id);
    }

    /// Drop every contract for which `should_drop` returns true
    ///
    /// Returns the IDs that were dropped.
    pub fn drop_contracts_where<F>(&mut self, mut should_drop: F) -> Vec<ContractId>
    where
        F: FnMut(ContractId) -> bool,
    {
        let mut dropped = Vec::new();
        self.contracts.retain(|&id| {
            if should_drop(id) {
                dropped.push(id);
                false
            } else {
                true
            }
        });
        dropped
    }

    pub fn update_infrastructure_cost(&mut self, cost: i64) {
        self.infrastructure_cost = cost;
    }

    /// Pay this month's infrastructure and per-contract production costs
    pub fn advance_budget(&mut self) {
        self.budget -= self.infrastructure_cost + self.production_cost * self.contracts.len() as i64;
    }

    /// Collect this month's leases and check for bankruptcy
    ///
    /// Contracts carrying a penalty yield nothing until the consumer clears
    /// the debt; cancelled contracts yield nothing at all. A negative budget
    /// afterwards bankrupts the distributor and terminates all of its
    /// contracts.
    ///
    /// Returns true if the distributor went bankrupt this month.
    pub fn advance_lease<'a, I>(&mut self, contracts: I) -> bool
    where
        I: IntoIterator<Item = &'a mut Contract>,
    {
        let mut contracts: Vec<&'a mut Contract> = contracts.into_iter().collect();

        for contract in contracts.iter() {
            if !contract.has_penalty() && !contract.is_cancelled() {
                self.budget += contract.current_price();
            }
        }

        let was_bankrupt = self.is_bankrupt;
        self.is_bankrupt = was_bankrupt || self.budget < 0;
        if self.is_bankrupt {
            for contract in contracts.iter_mut() {
                contract.terminate();
            }
        }
        self.is_bankrupt && !was_bankrupt
    }

    /// Recompute the production cost from the assigned producers
    ///
    /// `floor(sum(energy_per_distributor × price_kw) / 10)`
    pub fn update_production_cost<'a, I>(&mut self, producers: I)
    where
        I: IntoIterator<Item = &'a Producer>,
    {
        let cost: f64 = producers
            .into_iter()
            .map(|p| p.energy_per_distributor() as f64 * p.price_kw())
            .sum();
        self.production_cost = (cost / PRODUCTION_COST_DIVISOR).floor() as i64;
    }

    /// Recompute the price offered to consumers this turn
    ///
    /// The infrastructure cost is shared between current contracts using
    /// integer division.
    pub fn update_contract_cost(&mut self) {
        let profit = (PROFIT_MARGIN * self.production_cost as f32).floor() as i64;

        if self.contracts.is_empty() {
            self.contract_cost = self.infrastructure_cost + self.production_cost + profit;
            return;
        }

        self.contract_cost = self.infrastructure_cost / self.contracts.len() as i64
            + self.production_cost
            + profit;
    }

    /// Forget all assigned producers, returning them
    pub fn release_producers(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.producers)
    }

    pub fn assign_producer(&mut self, producer_id: EntityId) {
        self.producers.push(producer_id);
    }

    /// Start a new notification cycle; the allocation is fresh until told otherwise
    pub fn begin_notification_cycle(&mut self) {
        self.producer_changed = false;
    }

    /// React to a producer change notification
    ///
    /// Marks the allocation stale if the producer is one of ours.
    pub fn on_producer_changed(&mut self, producer_id: EntityId) -> bool {
        if self.producers.contains(&producer_id) {
            self.producer_changed = true;
            return true;
        }
        false
    }
}
