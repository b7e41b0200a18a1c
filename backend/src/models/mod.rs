//! Domain models for the energy market simulator

pub mod consumer;
pub mod contract;
pub mod distributor;
pub mod event;
pub mod producer;
pub mod state;

/// Identifier of a consumer, distributor or producer
pub type EntityId = u32;

// Re-exports
pub use consumer::{Consumer, LeaseOutcome};
pub use contract::{Contract, ContractId};
pub use distributor::Distributor;
pub use event::{Event, EventLog};
pub use producer::{EnergyType, MonthlyStat, Producer};
pub use state::MarketState;
