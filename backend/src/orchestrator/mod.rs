//! Orchestrator - main simulation loop
//!
//! Implements the monthly turn loop integrating all market components.
//!
//! See `engine.rs` for full implementation.

pub mod engine;
pub mod snapshot;


// Re-export main types for convenience
pub use engine::{
    ConsumerConfig, DistributorConfig, Orchestrator, OrchestratorConfig, ProducerConfig,
    SimulationError, TurnResult,
};

// Re-export report types
pub use snapshot::{
    report_hash, ConsumerRecord, ContractRecord, DistributorRecord, MarketReport,
    MonthlyStatRecord, ProducerRecord,
};
