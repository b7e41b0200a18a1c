//! Snapshot - Final Market Report
//!
//! Flattens the market state into the records written to the output
//! document, and fingerprints them for reproducibility checks.
//!
//! # Critical Invariants
//!
//! - **Ordering**: every collection is ascending by ID, bankrupt players
//!   merged in with active ones
//! - **Determinism**: same input produces the same report and the same hash
//! - **History**: producer statistics cover months 1..=number_of_turns

use crate::models::consumer::Consumer;
use crate::models::distributor::Distributor;
use crate::models::producer::{EnergyType, Producer};
use crate::models::state::MarketState;
use crate::models::EntityId;
use crate::orchestrator::SimulationError;
use crate::strategy::EnergyChoiceStrategy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Report Structures
// ============================================================================

/// Final state of the market, as written to the output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub consumers: Vec<ConsumerRecord>,
    pub distributors: Vec<DistributorRecord>,
    pub energy_producers: Vec<ProducerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerRecord {
    pub id: EntityId,
    pub is_bankrupt: bool,
    pub budget: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorRecord {
    pub id: EntityId,
    #[serde(rename = "energyNeededKW")]
    pub energy_needed_kw: i64,
    pub contract_cost: i64,
    pub budget: i64,
    pub producer_strategy: EnergyChoiceStrategy,
    pub is_bankrupt: bool,

    /// Live contracts, in signing order
    pub contracts: Vec<ContractRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub consumer_id: EntityId,

    /// Base price agreed at signing
    pub price: i64,
    pub remained_contract_months: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerRecord {
    pub id: EntityId,
    pub max_distributors: usize,
    #[serde(rename = "priceKW")]
    pub price_kw: f64,
    pub energy_type: EnergyType,
    pub energy_per_distributor: i64,
    pub monthly_stats: Vec<MonthlyStatRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatRecord {
    pub month: usize,
    pub distributors_ids: Vec<EntityId>,
}

impl From<&Consumer> for ConsumerRecord {
    fn from(consumer: &Consumer) -> Self {
        ConsumerRecord {
            id: consumer.id(),
            is_bankrupt: consumer.is_bankrupt(),
            budget: consumer.budget(),
        }
    }
}

impl From<&Producer> for ProducerRecord {
    fn from(producer: &Producer) -> Self {
        ProducerRecord {
            id: producer.id(),
            max_distributors: producer.max_distributors(),
            price_kw: producer.price_kw(),
            energy_type: producer.energy_type(),
            energy_per_distributor: producer.energy_per_distributor(),
            monthly_stats: producer
                .monthly_stats()
                .into_iter()
                .map(|stat| MonthlyStatRecord {
                    month: stat.month,
                    distributors_ids: stat.distributor_ids,
                })
                .collect(),
        }
    }
}

impl DistributorRecord {
    fn from_state(distributor: &Distributor, state: &MarketState) -> Self {
        DistributorRecord {
            id: distributor.id(),
            energy_needed_kw: distributor.energy_needed_kw(),
            contract_cost: distributor.contract_cost(),
            budget: distributor.budget(),
            producer_strategy: distributor.strategy(),
            is_bankrupt: distributor.is_bankrupt(),
            contracts: distributor
                .contract_ids()
                .iter()
                .filter_map(|&id| state.contract(id))
                .map(|contract| ContractRecord {
                    consumer_id: contract.contractee_id(),
                    price: contract.price(),
                    remained_contract_months: contract.remaining_months(),
                })
                .collect(),
        }
    }
}

impl MarketReport {
    /// Build the report from the current market state
    pub fn from_state(state: &MarketState) -> Self {
        MarketReport {
            consumers: state
                .all_consumers_sorted()
                .into_iter()
                .map(ConsumerRecord::from)
                .collect(),
            distributors: state
                .all_distributors_sorted()
                .into_iter()
                .map(|d| DistributorRecord::from_state(d, state))
                .collect(),
            energy_producers: state
                .producers_sorted()
                .into_iter()
                .map(ProducerRecord::from)
                .collect(),
        }
    }

    pub fn consumer(&self, id: EntityId) -> Option<&ConsumerRecord> {
        self.consumers.iter().find(|c| c.id == id)
    }

    pub fn distributor(&self, id: EntityId) -> Option<&DistributorRecord> {
        self.distributors.iter().find(|d| d.id == id)
    }

    pub fn producer(&self, id: EntityId) -> Option<&ProducerRecord> {
        self.energy_producers.iter().find(|p| p.id == id)
    }
}

// ============================================================================
// Report Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of a serializable value
///
/// Uses canonical JSON serialization with sorted keys so that two equal
/// reports always hash the same.
pub fn report_hash<T: Serialize>(report: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(report).map_err(|e| {
        SimulationError::Serialization(format!("Report serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("Report serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> MarketState {
        let mut state = MarketState::new(
            vec![Consumer::new(5, 10, 1), Consumer::new(2, 10, 1)],
            vec![Distributor::new(3, 4, 100, 10, 0, EnergyChoiceStrategy::Quantity)],
            vec![Producer::new(9, EnergyType::Nuclear, 2, 0.75, 30, 2)],
        );
        state.update_contract_costs();
        state.sign_contracts();
        state
    }

    #[test]
    fn test_report_sorted_by_id() {
        let report = MarketReport::from_state(&state());

        let ids: Vec<EntityId> = report.consumers.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(report.energy_producers[0].monthly_stats.len(), 2);
    }

    #[test]
    fn test_contracts_listed_in_signing_order() {
        let report = MarketReport::from_state(&state());
        let distributor = report.distributor(3).unwrap();

        let consumers: Vec<EntityId> = distributor.contracts.iter().map(|c| c.consumer_id).collect();
        assert_eq!(consumers, vec![5, 2]);
        assert_eq!(distributor.contracts[0].remained_contract_months, 4);
    }

    #[test]
    fn test_output_keys() {
        let report = MarketReport::from_state(&state());
        let json = serde_json::to_value(&report).unwrap();

        let distributor = &json["distributors"][0];
        assert!(distributor.get("energyNeededKW").is_some());
        assert_eq!(distributor["producerStrategy"], "QUANTITY");
        assert!(distributor["contracts"][0].get("remainedContractMonths").is_some());

        let producer = &json["energyProducers"][0];
        assert_eq!(producer["energyType"], "NUCLEAR");
        assert_eq!(producer["priceKW"], 0.75);
        assert!(producer["monthlyStats"][0].get("distributorsIds").is_some());
    }

    #[test]
    fn test_report_hash_deterministic() {
        let hash1 = report_hash(&MarketReport::from_state(&state())).unwrap();
        let hash2 = report_hash(&MarketReport::from_state(&state())).unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        let mut other = state();
        other.add_consumer(Consumer::new(8, 0, 0));
        let hash3 = report_hash(&MarketReport::from_state(&other)).unwrap();
        assert_ne!(hash1, hash3);
    }
}
