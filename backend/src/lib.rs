//! Energy Market Simulator Core - Rust Engine
//!
//! Monthly energy market simulation with deterministic execution: producers
//! supply distributors, distributors lease energy to consumers under priced
//! contracts, and players that cannot pay go bankrupt.
//!
//! # Architecture
//!
//! - **core**: Turn management
//! - **models**: Domain types (Consumer, Distributor, Producer, Contract, State)
//! - **strategy**: Producer ranking strategies (Green, Price, Quantity)
//! - **allocation**: Greedy producer assignment
//! - **events**: Per-turn change records and producer change propagation
//! - **orchestrator**: Main simulation loop and final report
//! - **io**: JSON input/output documents
//!
//! # Critical Invariants
//!
//! 1. All money values are i64; only producer prices are fractional
//! 2. No randomness: every ordering and tie-break is by input order or ID
//! 3. Contracts live in a single book owned by the market state

// Module declarations
pub mod allocation;
pub mod core;
pub mod events;
pub mod io;
pub mod models;
pub mod orchestrator;
pub mod strategy;

// Re-exports for convenience
pub use crate::core::time::TurnClock;
pub use models::{
    consumer::{Consumer, LeaseOutcome},
    contract::{Contract, ContractId},
    distributor::Distributor,
    event::{Event, EventLog},
    producer::{EnergyType, Producer},
    state::MarketState,
    EntityId,
};
pub use orchestrator::{
    ConsumerConfig, DistributorConfig, MarketReport, Orchestrator, OrchestratorConfig,
    ProducerConfig, SimulationError, TurnResult,
};
pub use strategy::EnergyChoiceStrategy;
