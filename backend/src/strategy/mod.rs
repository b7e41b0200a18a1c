//! Energy Choice Strategy Module
//!
//! A distributor picks its producers by walking the producer list in the
//! order given by its strategy. Strategies are pure comparators: they carry
//! no state between calls and every one of them ends with an ID tie-break,
//! so each is a total order and allocation is reproducible.
//!
//! Available strategies:
//! 1. **Green**: renewable producers first, then cheapest
//! 2. **Price**: cheapest producers first
//! 3. **Quantity**: producers handing out the most energy first
//!
//! # Example
//!
//! ```rust
//! use energy_market_core_rs::{EnergyChoiceStrategy, EnergyType, Producer};
//!
//! let mut producers = vec![
//!     Producer::new(1, EnergyType::Coal, 2, 0.5, 100, 1),
//!     Producer::new(2, EnergyType::Wind, 2, 0.9, 100, 1),
//! ];
//!
//! EnergyChoiceStrategy::Green.sort_producers(&mut producers);
//! assert_eq!(producers[0].id(), 2);
//!
//! EnergyChoiceStrategy::Price.sort_producers(&mut producers);
//! assert_eq!(producers[0].id(), 1);
//! ```

use crate::models::producer::Producer;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub mod green;
pub mod price;
pub mod quantity;

/// Producer ordering used by a distributor when (re)allocating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyChoiceStrategy {
    Green,
    Price,
    Quantity,
}

impl EnergyChoiceStrategy {
    /// Comparator implementing this strategy
    pub fn comparator(&self) -> fn(&Producer, &Producer) -> Ordering {
        match self {
            EnergyChoiceStrategy::Green => green::compare,
            EnergyChoiceStrategy::Price => price::compare,
            EnergyChoiceStrategy::Quantity => quantity::compare,
        }
    }

    /// Sort producers in place, best candidate first
    pub fn sort_producers(&self, producers: &mut [Producer]) {
        producers.sort_by(self.comparator());
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyChoiceStrategy::Green => "GREEN",
            EnergyChoiceStrategy::Price => "PRICE",
            EnergyChoiceStrategy::Quantity => "QUANTITY",
        }
    }
}

impl fmt::Display for EnergyChoiceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyChoiceStrategy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GREEN" => Ok(EnergyChoiceStrategy::Green),
            "PRICE" => Ok(EnergyChoiceStrategy::Price),
            "QUANTITY" => Ok(EnergyChoiceStrategy::Quantity),
            other => Err(SimulationError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::producer::EnergyType;

    fn ids(producers: &[Producer]) -> Vec<u32> {
        producers.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn test_sort_is_independent_of_input_order() {
        let base = vec![
            Producer::new(4, EnergyType::Coal, 1, 1.0, 10, 1),
            Producer::new(2, EnergyType::Coal, 1, 1.0, 10, 1),
            Producer::new(3, EnergyType::Solar, 1, 1.0, 10, 1),
            Producer::new(1, EnergyType::Nuclear, 1, 0.5, 10, 1),
        ];

        for strategy in [
            EnergyChoiceStrategy::Green,
            EnergyChoiceStrategy::Price,
            EnergyChoiceStrategy::Quantity,
        ] {
            let mut forward = base.clone();
            let mut backward: Vec<Producer> = base.iter().rev().cloned().collect();
            strategy.sort_producers(&mut forward);
            strategy.sort_producers(&mut backward);
            assert_eq!(ids(&forward), ids(&backward), "{} is not total", strategy);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_strategy() {
        assert_eq!(
            "QUANTITY".parse::<EnergyChoiceStrategy>().unwrap(),
            EnergyChoiceStrategy::Quantity
        );
        assert_eq!(
            "CHEAPEST".parse::<EnergyChoiceStrategy>(),
            Err(SimulationError::UnknownStrategy("CHEAPEST".to_string()))
        );
    }
}
