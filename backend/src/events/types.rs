//! Per-turn change records
//!
//! Every turn after the bootstrap the engine receives one change record
//! describing what happened outside the market that month: distributors
//! renegotiating their infrastructure cost, new consumers arriving and
//! producers changing the energy they hand to each distributor.
//!
//! # Design Principles
//!
//! 1. **Determinism**: records are applied in a fixed order (costs, consumers,
//!    producers) and in list order within each kind
//! 2. **Money is i64**: all monetary values are integers
//! 3. **Forgiving**: a record naming an unknown ID is skipped, never fatal

use crate::models::EntityId;
use crate::orchestrator::ConsumerConfig;
use serde::{Deserialize, Serialize};

/// New infrastructure cost for a distributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorChange {
    pub id: EntityId,
    pub infrastructure_cost: i64,
}

/// New energy per distributor for a producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerChange {
    pub id: EntityId,
    pub energy_per_distributor: i64,
}

/// Everything that changes from outside the market in one turn
///
/// # Example
/// ```
/// use energy_market_core_rs::events::TurnChanges;
///
/// let changes: TurnChanges = serde_json::from_str(
///     r#"{ "producerChanges": [{ "id": 2, "energyPerDistributor": 900 }] }"#,
/// ).unwrap();
///
/// assert!(changes.new_consumers.is_empty());
/// assert_eq!(changes.producer_changes[0].energy_per_distributor, 900);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnChanges {
    #[serde(default)]
    pub new_consumers: Vec<ConsumerConfig>,

    #[serde(default)]
    pub distributor_changes: Vec<DistributorChange>,

    #[serde(default)]
    pub producer_changes: Vec<ProducerChange>,
}

impl TurnChanges {
    /// Record with no changes at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.new_consumers.is_empty()
            && self.distributor_changes.is_empty()
            && self.producer_changes.is_empty()
    }

    pub fn with_new_consumer(mut self, consumer: ConsumerConfig) -> Self {
        self.new_consumers.push(consumer);
        self
    }

    pub fn with_distributor_change(mut self, id: EntityId, infrastructure_cost: i64) -> Self {
        self.distributor_changes.push(DistributorChange {
            id,
            infrastructure_cost,
        });
        self
    }

    pub fn with_producer_change(mut self, id: EntityId, energy_per_distributor: i64) -> Self {
        self.producer_changes.push(ProducerChange {
            id,
            energy_per_distributor,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_changes() {
        let changes = TurnChanges::empty()
            .with_distributor_change(1, 300)
            .with_producer_change(2, 50)
            .with_new_consumer(ConsumerConfig {
                id: 9,
                initial_budget: 100,
                monthly_income: 20,
            });

        assert!(!changes.is_empty());
        assert_eq!(changes.distributor_changes.len(), 1);
        assert_eq!(changes.new_consumers[0].id, 9);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let changes: TurnChanges = serde_json::from_str("{}").unwrap();
        assert!(changes.is_empty());
    }
}
