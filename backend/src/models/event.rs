//! Event logging for simulation auditing and replay checks.
//!
//! This module defines the Event enum which captures every significant state
//! change during a run. Events enable:
//! - Debugging (understand what happened and when)
//! - Auditing (verify contract and bankruptcy bookkeeping)
//! - Reproducibility checks (two runs of the same input log the same events)
//!
//! # Event Types
//!
//! Events are categorized by pipeline step:
//! - **Changes**: external change records applied or skipped
//! - **Allocation**: a distributor picked new producers
//! - **Contracts**: signed, paid off, cancelled
//! - **Leases**: payments and penalties
//! - **Bankruptcy**: consumers and distributors leaving the market
//!
//! # Example
//!
//! ```rust
//! use energy_market_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::ContractSigned {
//!     turn: 0,
//!     contract_id: 1,
//!     distributor_id: 3,
//!     consumer_id: 7,
//!     price: 120,
//!     months: 12,
//! });
//!
//! assert_eq!(log.events_for_entity(7).len(), 1);
//! ```

use crate::models::contract::ContractId;
use crate::models::EntityId;

/// Simulation event capturing a state change.
///
/// All events include the turn number for temporal ordering.
/// Events are logged in the order they occur within a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Distributor infrastructure cost replaced by a change record
    InfrastructureCostChanged {
        turn: usize,
        distributor_id: EntityId,
        old_cost: i64,
        new_cost: i64,
    },

    /// Consumer joined the market mid-run
    ConsumerJoined {
        turn: usize,
        consumer_id: EntityId,
        budget: i64,
        monthly_income: i64,
    },

    /// Producer energy per distributor replaced by a change record
    ProducerEnergyChanged {
        turn: usize,
        producer_id: EntityId,
        old_energy: i64,
        new_energy: i64,
    },

    /// Change record ignored (unknown or duplicate ID)
    ChangeSkipped {
        turn: usize,
        entity_id: EntityId,
        reason: String,
    },

    /// Distributor dropped its producers and picked new ones
    ProducersReallocated {
        turn: usize,
        distributor_id: EntityId,
        producer_ids: Vec<EntityId>,
        energy_supplied: i64,
        energy_needed: i64,
        production_cost: i64,
    },

    /// New contract between the cheapest distributor and a consumer
    ContractSigned {
        turn: usize,
        contract_id: ContractId,
        distributor_id: EntityId,
        consumer_id: EntityId,
        price: i64,
        months: i64,
    },

    /// Consumer paid the current price of its contract
    LeasePaid {
        turn: usize,
        consumer_id: EntityId,
        amount: i64,
    },

    /// Consumer missed a payment and the contract got a penalty
    PenaltyApplied {
        turn: usize,
        consumer_id: EntityId,
        penalty: i64,
    },

    /// Fully paid contract destroyed
    ContractPaid {
        turn: usize,
        contract_id: ContractId,
        distributor_id: EntityId,
        consumer_id: EntityId,
    },

    /// Cancelled contract destroyed
    ContractCancelled {
        turn: usize,
        contract_id: ContractId,
        distributor_id: EntityId,
        consumer_id: EntityId,
    },

    /// Consumer went bankrupt
    ConsumerBankrupt { turn: usize, consumer_id: EntityId },

    /// Distributor went bankrupt
    DistributorBankrupt {
        turn: usize,
        distributor_id: EntityId,
        budget: i64,
    },
}

impl Event {
    /// Get the turn number when this event occurred
    pub fn turn(&self) -> usize {
        match self {
            Event::InfrastructureCostChanged { turn, .. } => *turn,
            Event::ConsumerJoined { turn, .. } => *turn,
            Event::ProducerEnergyChanged { turn, .. } => *turn,
            Event::ChangeSkipped { turn, .. } => *turn,
            Event::ProducersReallocated { turn, .. } => *turn,
            Event::ContractSigned { turn, .. } => *turn,
            Event::LeasePaid { turn, .. } => *turn,
            Event::PenaltyApplied { turn, .. } => *turn,
            Event::ContractPaid { turn, .. } => *turn,
            Event::ContractCancelled { turn, .. } => *turn,
            Event::ConsumerBankrupt { turn, .. } => *turn,
            Event::DistributorBankrupt { turn, .. } => *turn,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::InfrastructureCostChanged { .. } => "InfrastructureCostChanged",
            Event::ConsumerJoined { .. } => "ConsumerJoined",
            Event::ProducerEnergyChanged { .. } => "ProducerEnergyChanged",
            Event::ChangeSkipped { .. } => "ChangeSkipped",
            Event::ProducersReallocated { .. } => "ProducersReallocated",
            Event::ContractSigned { .. } => "ContractSigned",
            Event::LeasePaid { .. } => "LeasePaid",
            Event::PenaltyApplied { .. } => "PenaltyApplied",
            Event::ContractPaid { .. } => "ContractPaid",
            Event::ContractCancelled { .. } => "ContractCancelled",
            Event::ConsumerBankrupt { .. } => "ConsumerBankrupt",
            Event::DistributorBankrupt { .. } => "DistributorBankrupt",
        }
    }

    /// IDs of the market players this event concerns
    ///
    /// Player IDs share one number space in the input documents, so a
    /// consumer and a distributor may both match the same ID.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        match self {
            Event::InfrastructureCostChanged { distributor_id, .. } => vec![*distributor_id],
            Event::ConsumerJoined { consumer_id, .. } => vec![*consumer_id],
            Event::ProducerEnergyChanged { producer_id, .. } => vec![*producer_id],
            Event::ChangeSkipped { entity_id, .. } => vec![*entity_id],
            Event::ProducersReallocated { distributor_id, .. } => vec![*distributor_id],
            Event::ContractSigned {
                distributor_id,
                consumer_id,
                ..
            }
            | Event::ContractPaid {
                distributor_id,
                consumer_id,
                ..
            }
            | Event::ContractCancelled {
                distributor_id,
                consumer_id,
                ..
            } => vec![*distributor_id, *consumer_id],
            Event::LeasePaid { consumer_id, .. } => vec![*consumer_id],
            Event::PenaltyApplied { consumer_id, .. } => vec![*consumer_id],
            Event::ConsumerBankrupt { consumer_id, .. } => vec![*consumer_id],
            Event::DistributorBankrupt { distributor_id, .. } => vec![*distributor_id],
        }
    }

    /// Get contract ID if event relates to a specific contract
    pub fn contract_id(&self) -> Option<ContractId> {
        match self {
            Event::ContractSigned { contract_id, .. } => Some(*contract_id),
            Event::ContractPaid { contract_id, .. } => Some(*contract_id),
            Event::ContractCancelled { contract_id, .. } => Some(*contract_id),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific turn
    pub fn events_at_turn(&self, turn: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.turn() == turn).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events concerning a specific market player
    pub fn events_for_entity(&self, entity_id: EntityId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.entity_ids().contains(&entity_id))
            .collect()
    }

    /// Get events for a specific contract
    pub fn events_for_contract(&self, contract_id: ContractId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.contract_id() == Some(contract_id))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
