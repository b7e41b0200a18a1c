//! Input document
//!
//! ```text
//! { "numberOfTurns": N,
//!   "initialData": { "consumers": [...], "distributors": [...], "producers": [...] },
//!   "monthlyUpdates": [{ "newConsumers", "distributorChanges", "producerChanges" }] }
//! ```
//!
//! Missing arrays default to empty. Strategy and energy type names are kept
//! as strings while parsing and validated when converting to configuration,
//! so an unknown name surfaces as a `SimulationError` rather than a JSON
//! error.

use crate::events::TurnChanges;
use crate::io::DocumentError;
use crate::models::EntityId;
use crate::orchestrator::{
    ConsumerConfig, DistributorConfig, OrchestratorConfig, ProducerConfig, SimulationError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    pub number_of_turns: usize,
    pub initial_data: InitialData,

    /// Change record of turn `i + 1` at index `i`
    #[serde(default)]
    pub monthly_updates: Vec<TurnChanges>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    #[serde(default)]
    pub consumers: Vec<ConsumerConfig>,

    #[serde(default)]
    pub distributors: Vec<DistributorEntry>,

    #[serde(default)]
    pub producers: Vec<ProducerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorEntry {
    pub id: EntityId,
    pub contract_length: i64,
    pub initial_budget: i64,
    pub initial_infrastructure_cost: i64,
    #[serde(rename = "energyNeededKW")]
    pub energy_needed_kw: i64,
    pub producer_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerEntry {
    pub id: EntityId,
    pub energy_type: String,
    pub max_distributors: usize,
    #[serde(rename = "priceKW")]
    pub price_kw: f64,
    pub energy_per_distributor: i64,
}

impl TryFrom<&DistributorEntry> for DistributorConfig {
    type Error = SimulationError;

    fn try_from(entry: &DistributorEntry) -> Result<Self, Self::Error> {
        Ok(DistributorConfig {
            id: entry.id,
            contract_length: entry.contract_length,
            initial_budget: entry.initial_budget,
            infrastructure_cost: entry.initial_infrastructure_cost,
            energy_needed_kw: entry.energy_needed_kw,
            strategy: entry.producer_strategy.parse()?,
        })
    }
}

impl TryFrom<&ProducerEntry> for ProducerConfig {
    type Error = SimulationError;

    fn try_from(entry: &ProducerEntry) -> Result<Self, Self::Error> {
        Ok(ProducerConfig {
            id: entry.id,
            energy_type: entry.energy_type.parse()?,
            max_distributors: entry.max_distributors,
            price_kw: entry.price_kw,
            energy_per_distributor: entry.energy_per_distributor,
        })
    }
}

impl InputDocument {
    /// Engine configuration and the change records, one per turn
    ///
    /// Missing trailing records are filled with empty ones; records beyond
    /// `number_of_turns` are dropped.
    pub fn to_config(&self) -> Result<(OrchestratorConfig, Vec<TurnChanges>), SimulationError> {
        let distributors = self
            .initial_data
            .distributors
            .iter()
            .map(DistributorConfig::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let producers = self
            .initial_data
            .producers
            .iter()
            .map(ProducerConfig::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let config = OrchestratorConfig {
            number_of_turns: self.number_of_turns,
            consumers: self.initial_data.consumers.clone(),
            distributors,
            producers,
        };

        let mut monthly_updates: Vec<TurnChanges> = self
            .monthly_updates
            .iter()
            .take(self.number_of_turns)
            .cloned()
            .collect();
        monthly_updates.resize(self.number_of_turns, TurnChanges::empty());

        Ok((config, monthly_updates))
    }
}

/// Parse an input document from a JSON string
pub fn parse_document(json: &str) -> Result<InputDocument, DocumentError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse an input document from disk
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<InputDocument, DocumentError> {
    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents)
}
