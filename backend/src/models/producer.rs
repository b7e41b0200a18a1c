//! Producer model
//!
//! An energy source that supplies a bounded number of distributors.
//! Each producer has:
//! - Energy type (renewable or not)
//! - Price per kW (f64, the only fractional quantity in the market)
//! - Maximum number of distributors it can serve
//! - Energy handed to each distributor (mutable through change records)
//! - Per-turn history of the distributors drawing from it
//!
//! # Critical Invariants
//!
//! 1. The history holds exactly `number_of_turns + 1` sets (turn 0 included)
//! 2. No turn's set ever holds more than `max_distributors` IDs

use crate::events::channel::ChangeChannel;
use crate::models::EntityId;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Source of a producer's energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyType {
    Wind,
    Solar,
    Hydro,
    Coal,
    Nuclear,
}

impl EnergyType {
    pub fn is_renewable(&self) -> bool {
        matches!(self, EnergyType::Wind | EnergyType::Solar | EnergyType::Hydro)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyType::Wind => "WIND",
            EnergyType::Solar => "SOLAR",
            EnergyType::Hydro => "HYDRO",
            EnergyType::Coal => "COAL",
            EnergyType::Nuclear => "NUCLEAR",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WIND" => Ok(EnergyType::Wind),
            "SOLAR" => Ok(EnergyType::Solar),
            "HYDRO" => Ok(EnergyType::Hydro),
            "COAL" => Ok(EnergyType::Coal),
            "NUCLEAR" => Ok(EnergyType::Nuclear),
            other => Err(SimulationError::UnknownEnergyType(other.to_string())),
        }
    }
}

/// Distributors drawing from a producer during one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub month: usize,
    pub distributor_ids: Vec<EntityId>,
}

/// An energy producer
///
/// # Example
/// ```
/// use energy_market_core_rs::{EnergyType, Producer};
/// use std::collections::BTreeSet;
///
/// let mut producer = Producer::new(1, EnergyType::Wind, 2, 0.5, 1000, 3);
/// producer.add_distributor(10, 0);
/// producer.carry_forward(1, &BTreeSet::new());
/// producer.add_distributor(11, 1);
///
/// assert!(producer.is_full(1));
/// assert_eq!(producer.distributors_at(1), vec![10, 11]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    id: EntityId,
    energy_type: EnergyType,
    max_distributors: usize,
    price_kw: f64,
    energy_per_distributor: i64,

    /// Distributor IDs per turn, indexed by turn number
    history: Vec<BTreeSet<EntityId>>,
}

impl Producer {
    /// Create a producer with an empty history for `number_of_turns + 1` turns
    pub fn new(
        id: EntityId,
        energy_type: EnergyType,
        max_distributors: usize,
        price_kw: f64,
        energy_per_distributor: i64,
        number_of_turns: usize,
    ) -> Self {
        Self {
            id,
            energy_type,
            max_distributors,
            price_kw,
            energy_per_distributor,
            history: vec![BTreeSet::new(); number_of_turns + 1],
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn energy_type(&self) -> EnergyType {
        self.energy_type
    }

    pub fn is_renewable(&self) -> bool {
        self.energy_type.is_renewable()
    }

    pub fn max_distributors(&self) -> usize {
        self.max_distributors
    }

    pub fn price_kw(&self) -> f64 {
        self.price_kw
    }

    pub fn energy_per_distributor(&self) -> i64 {
        self.energy_per_distributor
    }

    /// Change the energy handed to each distributor and notify subscribers
    ///
    /// Every distributor currently drawing from this producer will see the
    /// notification at the next delivery and mark its allocation stale.
    pub fn set_energy_per_distributor(&mut self, energy: i64, channel: &mut ChangeChannel) {
        self.energy_per_distributor = energy;
        channel.publish_producer_changed(self.id);
    }

    /// Record a distributor as drawing from this producer at `turn`
    ///
    /// Ignored when the turn is already full or out of range.
    pub fn add_distributor(&mut self, distributor_id: EntityId, turn: usize) -> bool {
        let max = self.max_distributors;
        match self.history.get_mut(turn) {
            Some(set) if set.len() < max => set.insert(distributor_id),
            _ => false,
        }
    }

    /// Remove a distributor from the set of `turn`
    pub fn remove_distributor(&mut self, distributor_id: EntityId, turn: usize) -> bool {
        self.history
            .get_mut(turn)
            .map(|set| set.remove(&distributor_id))
            .unwrap_or(false)
    }

    /// Union the previous turn's distributors into `turn`
    ///
    /// Assignments persist across turns unless a distributor reallocates.
    /// Distributors in `departed` have left the market and are not carried,
    /// which frees their slots.
    pub fn carry_forward(&mut self, turn: usize, departed: &BTreeSet<EntityId>) {
        if turn == 0 || turn >= self.history.len() {
            return;
        }
        let previous: Vec<EntityId> = self.history[turn - 1]
            .difference(departed)
            .copied()
            .collect();
        self.history[turn].extend(previous);
    }

    /// Whether no more distributors fit at `turn`
    pub fn is_full(&self, turn: usize) -> bool {
        self.history
            .get(turn)
            .map(|set| set.len() >= self.max_distributors)
            .unwrap_or(true)
    }

    /// Distributor IDs drawing from this producer at `turn`, ascending
    pub fn distributors_at(&self, turn: usize) -> Vec<EntityId> {
        self.history
            .get(turn)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of turns tracked, excluding turn 0
    pub fn number_of_turns(&self) -> usize {
        self.history.len() - 1
    }

    /// Per-month statistics for turns 1..=number_of_turns
    pub fn monthly_stats(&self) -> Vec<MonthlyStat> {
        self.history
            .iter()
            .enumerate()
            .skip(1)
            .map(|(month, set)| MonthlyStat {
                month,
                distributor_ids: set.iter().copied().collect(),
            })
            .collect()
    }
}
