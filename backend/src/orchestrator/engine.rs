//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - External change records (costs, new consumers, producer output)
//! - Change propagation to distributors
//! - Producer allocation
//! - Contract pricing, signing and settlement
//! - Bankruptcy handling
//! - Event logging (complete simulation history)
//!
//! # Architecture
//!
//! The Orchestrator runs one turn per simulated month:
//!
//! ```text
//! For each turn t >= 1:
//! 1. Apply the change record, deliver producer notices
//! 2. Carry producer assignments forward from t-1
//! 3. Reallocate producers of stale distributors
//! 4. Recompute contract costs
//! 5. Purge paid contracts
//! 6. Sign contracts with the cheapest distributor
//! 7. Advance consumers, then distributors
//! 8. Purge cancelled contracts
//! 9. Purge bankrupt players
//! ```
//!
//! The bootstrap turn 0 runs steps 3, 4, 6 and 7 only.
//!
//! # Example
//!
//! ```rust
//! use energy_market_core_rs::events::TurnChanges;
//! use energy_market_core_rs::orchestrator::{
//!     ConsumerConfig, DistributorConfig, Orchestrator, OrchestratorConfig, ProducerConfig,
//! };
//! use energy_market_core_rs::{EnergyChoiceStrategy, EnergyType};
//!
//! let config = OrchestratorConfig {
//!     number_of_turns: 2,
//!     consumers: vec![ConsumerConfig { id: 0, initial_budget: 100, monthly_income: 50 }],
//!     distributors: vec![DistributorConfig {
//!         id: 0,
//!         contract_length: 3,
//!         initial_budget: 500,
//!         infrastructure_cost: 20,
//!         energy_needed_kw: 100,
//!         strategy: EnergyChoiceStrategy::Green,
//!     }],
//!     producers: vec![ProducerConfig {
//!         id: 0,
//!         energy_type: EnergyType::Wind,
//!         max_distributors: 1,
//!         price_kw: 0.5,
//!         energy_per_distributor: 100,
//!     }],
//! };
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! orchestrator.run_bootstrap().unwrap();
//! while !orchestrator.is_finished() {
//!     let result = orchestrator.run_turn(&TurnChanges::empty()).unwrap();
//!     println!("Turn {}: {} contracts signed", result.turn, result.num_contracts_signed);
//! }
//! ```

use crate::allocation::reallocate_producers;
use crate::core::time::TurnClock;
use crate::events::{ChangeChannel, TurnChanges};
use crate::models::consumer::{Consumer, LeaseOutcome};
use crate::models::distributor::Distributor;
use crate::models::event::{Event, EventLog};
use crate::models::producer::{EnergyType, Producer};
use crate::models::state::MarketState;
use crate::models::EntityId;
use crate::orchestrator::snapshot::MarketReport;
use crate::strategy::EnergyChoiceStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete orchestrator configuration
///
/// # Fields
///
/// * `number_of_turns` - Months simulated after the bootstrap turn
/// * `consumers` - Consumers present from the start
/// * `distributors` - Distributors present from the start
/// * `producers` - The fixed producer set
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub number_of_turns: usize,
    pub consumers: Vec<ConsumerConfig>,
    pub distributors: Vec<DistributorConfig>,
    pub producers: Vec<ProducerConfig>,
}

/// Initial state of a consumer
///
/// Also used for consumers joining through a change record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerConfig {
    pub id: EntityId,
    pub initial_budget: i64,
    pub monthly_income: i64,
}

/// Initial state of a distributor
#[derive(Debug, Clone, PartialEq)]
pub struct DistributorConfig {
    pub id: EntityId,

    /// Months every contract it signs runs for
    pub contract_length: i64,

    pub initial_budget: i64,
    pub infrastructure_cost: i64,
    pub energy_needed_kw: i64,
    pub strategy: EnergyChoiceStrategy,
}

/// Initial state of a producer
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerConfig {
    pub id: EntityId,
    pub energy_type: EnergyType,
    pub max_distributors: usize,
    pub price_kw: f64,
    pub energy_per_distributor: i64,
}

impl From<&ConsumerConfig> for Consumer {
    fn from(config: &ConsumerConfig) -> Self {
        Consumer::new(config.id, config.initial_budget, config.monthly_income)
    }
}

impl From<&DistributorConfig> for Distributor {
    fn from(config: &DistributorConfig) -> Self {
        Distributor::new(
            config.id,
            config.contract_length,
            config.initial_budget,
            config.infrastructure_cost,
            config.energy_needed_kw,
            config.strategy,
        )
    }
}

impl ProducerConfig {
    fn build(&self, number_of_turns: usize) -> Producer {
        Producer::new(
            self.id,
            self.energy_type,
            self.max_distributors,
            self.price_kw,
            self.energy_per_distributor,
            number_of_turns,
        )
    }
}

// ============================================================================
// Results and Errors
// ============================================================================

/// Result of a single turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnResult {
    /// Turn number
    pub turn: usize,

    /// Change record entries applied / skipped
    pub num_changes_applied: usize,
    pub num_changes_skipped: usize,

    /// Distributors that picked new producers
    pub num_reallocations: usize,

    pub num_contracts_signed: usize,
    pub num_contracts_paid: usize,
    pub num_contracts_cancelled: usize,

    pub num_consumer_bankruptcies: usize,
    pub num_distributor_bankruptcies: usize,
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown producer strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown energy type: {0}")]
    UnknownEnergyType(String),

    /// The bootstrap turn has not run yet
    #[error("Bootstrap turn must run before turn {turn}")]
    BootstrapRequired { turn: usize },

    /// The bootstrap turn already ran
    #[error("Bootstrap turn already ran")]
    AlreadyBootstrapped,

    /// Every turn already ran
    #[error("Simulation finished after {turns} turns")]
    SimulationFinished { turns: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator managing market state and the turn loop
///
/// The Orchestrator owns all simulation state and coordinates:
/// - Change records and their propagation
/// - Producer allocation
/// - Contract signing and settlement
/// - Event logging
///
/// # Determinism
///
/// The engine draws no randomness: every sweep walks collections in input
/// order and every tie is broken by ID. Same config + same change records =
/// identical results.
pub struct Orchestrator {
    /// Market state (players and contract book)
    state: MarketState,

    /// Turn management
    clock: TurnClock,

    /// Pending producer change notices
    channel: ChangeChannel,

    /// Event log (all simulation events)
    event_log: EventLog,
}

impl Orchestrator {
    /// Create new orchestrator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Successfully initialized orchestrator
    /// * `Err(SimulationError)` - Configuration validation failed
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let consumers = config.consumers.iter().map(Consumer::from).collect();
        let distributors = config.distributors.iter().map(Distributor::from).collect();
        let producers = config
            .producers
            .iter()
            .map(|pc| pc.build(config.number_of_turns))
            .collect();

        Ok(Self {
            state: MarketState::new(consumers, distributors, producers),
            clock: TurnClock::new(config.number_of_turns),
            channel: ChangeChannel::new(),
            event_log: EventLog::new(),
        })
    }

    /// Validate configuration
    fn validate_config(config: &OrchestratorConfig) -> Result<(), SimulationError> {
        check_unique("consumer", config.consumers.iter().map(|c| c.id))?;
        check_unique("distributor", config.distributors.iter().map(|d| d.id))?;
        check_unique("producer", config.producers.iter().map(|p| p.id))?;

        for distributor in &config.distributors {
            if distributor.contract_length < 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "Distributor {} has negative contract length {}",
                    distributor.id, distributor.contract_length
                )));
            }
        }

        for producer in &config.producers {
            if !producer.price_kw.is_finite() {
                return Err(SimulationError::InvalidConfig(format!(
                    "Producer {} has non-finite price",
                    producer.id
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Turn that will execute next
    pub fn current_turn(&self) -> usize {
        self.clock.current_turn()
    }

    pub fn number_of_turns(&self) -> usize {
        self.clock.number_of_turns()
    }

    /// Whether every turn, bootstrap included, has run
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Get reference to market state
    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// Get mutable reference to market state
    ///
    /// Primarily for testing. Direct state mutation bypasses orchestrator
    /// invariants.
    pub fn state_mut(&mut self) -> &mut MarketState {
        &mut self.state
    }

    /// Get total events logged
    pub fn event_count(&self) -> usize {
        self.event_log.len()
    }

    /// Get reference to event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Final records of the market in its current state
    pub fn report(&self) -> MarketReport {
        MarketReport::from_state(&self.state)
    }

    // ========================================================================
    // Turn Loop Implementation
    // ========================================================================

    /// Execute the bootstrap turn (turn 0)
    ///
    /// Allocates producers, prices and signs the first contracts and runs
    /// the first month of payments. Nothing is purged.
    pub fn run_bootstrap(&mut self) -> Result<TurnResult, SimulationError> {
        if self.clock.is_bootstrapped() {
            return Err(SimulationError::AlreadyBootstrapped);
        }

        let turn = self.clock.current_turn();
        let mut result = TurnResult {
            turn,
            ..TurnResult::default()
        };

        self.reallocate(turn, &mut result);
        self.state.update_contract_costs();
        self.sign_contracts(turn, &mut result);
        self.advance_players(turn, &mut result);

        self.clock.advance();
        Ok(result)
    }

    /// Execute one month with its change record
    ///
    /// # Returns
    ///
    /// * `Ok(TurnResult)` - Turn executed successfully
    /// * `Err(SimulationError)` - Bootstrap missing or simulation finished
    pub fn run_turn(&mut self, changes: &TurnChanges) -> Result<TurnResult, SimulationError> {
        let turn = self.clock.current_turn();
        if !self.clock.is_bootstrapped() {
            return Err(SimulationError::BootstrapRequired { turn: turn + 1 });
        }
        if self.clock.is_finished() {
            return Err(SimulationError::SimulationFinished {
                turns: self.clock.number_of_turns(),
            });
        }

        let mut result = TurnResult {
            turn,
            ..TurnResult::default()
        };

        // STEP 1: EXTERNAL CHANGES
        for event in changes.apply(&mut self.state, &mut self.channel, turn) {
            if matches!(event, Event::ChangeSkipped { .. }) {
                result.num_changes_skipped += 1;
            } else {
                result.num_changes_applied += 1;
            }
            self.log_event(event);
        }
        self.channel.deliver(self.state.distributors_mut());

        // STEP 2: CARRY FORWARD ASSIGNMENTS
        self.state.carry_forward_assignments(turn);

        // STEP 3-4: ALLOCATION AND PRICING
        self.reallocate(turn, &mut result);
        self.state.update_contract_costs();

        // STEP 5: PURGE PAID CONTRACTS
        for contract in self.state.purge_paid_contracts() {
            result.num_contracts_paid += 1;
            self.log_event(Event::ContractPaid {
                turn,
                contract_id: contract.id(),
                distributor_id: contract.contractor_id(),
                consumer_id: contract.contractee_id(),
            });
        }

        // STEP 6-7: SIGNING AND PAYMENTS
        self.sign_contracts(turn, &mut result);
        self.advance_players(turn, &mut result);

        // STEP 8: PURGE CANCELLED CONTRACTS
        for contract in self.state.purge_cancelled_contracts() {
            result.num_contracts_cancelled += 1;
            self.log_event(Event::ContractCancelled {
                turn,
                contract_id: contract.id(),
                distributor_id: contract.contractor_id(),
                consumer_id: contract.contractee_id(),
            });
        }

        // STEP 9: PURGE BANKRUPT PLAYERS
        self.state.purge_bankrupt_players();

        self.clock.advance();
        Ok(result)
    }

    /// Run every remaining turn and return the final report
    ///
    /// `monthly_updates[i]` is the change record of turn `i + 1`; turns
    /// without a record run with an empty one. Extra records are ignored.
    pub fn run(&mut self, monthly_updates: &[TurnChanges]) -> Result<MarketReport, SimulationError> {
        if !self.clock.is_bootstrapped() {
            self.run_bootstrap()?;
        }

        let empty = TurnChanges::empty();
        while !self.clock.is_finished() {
            let turn = self.clock.current_turn();
            let changes = monthly_updates.get(turn - 1).unwrap_or(&empty);
            self.run_turn(changes)?;
        }

        Ok(self.report())
    }

    // ========================================================================
    // Pipeline Steps
    // ========================================================================

    fn reallocate(&mut self, turn: usize, result: &mut TurnResult) {
        for allocation in reallocate_producers(&mut self.state, turn) {
            result.num_reallocations += 1;
            self.log_event(Event::ProducersReallocated {
                turn,
                distributor_id: allocation.distributor_id,
                producer_ids: allocation.producer_ids,
                energy_supplied: allocation.energy_supplied,
                energy_needed: allocation.energy_needed,
                production_cost: allocation.production_cost,
            });
        }
    }

    fn sign_contracts(&mut self, turn: usize, result: &mut TurnResult) {
        for contract_id in self.state.sign_contracts() {
            let Some(contract) = self.state.contract(contract_id) else {
                continue;
            };
            let event = Event::ContractSigned {
                turn,
                contract_id,
                distributor_id: contract.contractor_id(),
                consumer_id: contract.contractee_id(),
                price: contract.price(),
                months: contract.remaining_months(),
            };
            result.num_contracts_signed += 1;
            self.log_event(event);
        }
    }

    fn advance_players(&mut self, turn: usize, result: &mut TurnResult) {
        for (consumer_id, outcome) in self.state.advance_consumers() {
            let event = match outcome {
                LeaseOutcome::Paid { amount } => Event::LeasePaid {
                    turn,
                    consumer_id,
                    amount,
                },
                LeaseOutcome::Deferred { penalty } => Event::PenaltyApplied {
                    turn,
                    consumer_id,
                    penalty,
                },
                LeaseOutcome::Bankrupt => {
                    result.num_consumer_bankruptcies += 1;
                    Event::ConsumerBankrupt { turn, consumer_id }
                }
                LeaseOutcome::Cancelled | LeaseOutcome::NoContract => continue,
            };
            self.log_event(event);
        }

        for distributor_id in self.state.advance_distributors() {
            let budget = self
                .state
                .get_distributor(distributor_id)
                .map(Distributor::budget)
                .unwrap_or_default();
            result.num_distributor_bankruptcies += 1;
            self.log_event(Event::DistributorBankrupt {
                turn,
                distributor_id,
                budget,
            });
        }
    }

    // ========================================================================
    // Event Logging
    // ========================================================================

    fn log_event(&mut self, event: Event) {
        self.event_log.log(event);
    }
}

fn check_unique<I>(kind: &str, ids: I) -> Result<(), SimulationError>
where
    I: IntoIterator<Item = EntityId>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SimulationError::InvalidConfig(format!(
                "Duplicate {} ID: {}",
                kind, id
            )));
        }
    }
    Ok(())
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("current_turn", &self.current_turn())
            .field("number_of_turns", &self.number_of_turns())
            .field("num_consumers", &self.state.consumers().len())
            .field("num_distributors", &self.state.distributors().len())
            .field("num_contracts", &self.state.num_contracts())
            .field("event_count", &self.event_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
