//! Change record execution
//!
//! This module handles:
//! - Applying a turn's change record to the market state
//! - Publishing producer change notices
//! - Logging applied and skipped changes

use crate::events::channel::ChangeChannel;
use crate::events::types::TurnChanges;
use crate::models::{consumer::Consumer, state::MarketState, EntityId, Event};

impl TurnChanges {
    /// Apply this record to the market state
    ///
    /// Order: distributor cost changes, new consumers, producer changes.
    /// Producer changes publish a notice on `channel`; delivery is up to the
    /// caller. Records naming unknown IDs are skipped and reported as
    /// `Event::ChangeSkipped`.
    ///
    /// # Returns
    /// Events describing every applied or skipped change, in order
    pub fn apply(
        &self,
        state: &mut MarketState,
        channel: &mut ChangeChannel,
        turn: usize,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        for change in &self.distributor_changes {
            match state.get_distributor_mut(change.id) {
                Some(distributor) => {
                    let old_cost = distributor.infrastructure_cost();
                    distributor.update_infrastructure_cost(change.infrastructure_cost);
                    events.push(Event::InfrastructureCostChanged {
                        turn,
                        distributor_id: change.id,
                        old_cost,
                        new_cost: change.infrastructure_cost,
                    });
                }
                None => events.push(skipped(turn, change.id, "unknown distributor")),
            }
        }

        for config in &self.new_consumers {
            let consumer = Consumer::from(config);
            if state.add_consumer(consumer) {
                events.push(Event::ConsumerJoined {
                    turn,
                    consumer_id: config.id,
                    budget: config.initial_budget,
                    monthly_income: config.monthly_income,
                });
            } else {
                events.push(skipped(turn, config.id, "duplicate consumer"));
            }
        }

        for change in &self.producer_changes {
            match state.get_producer_mut(change.id) {
                Some(producer) => {
                    let old_energy = producer.energy_per_distributor();
                    producer.set_energy_per_distributor(change.energy_per_distributor, channel);
                    events.push(Event::ProducerEnergyChanged {
                        turn,
                        producer_id: change.id,
                        old_energy,
                        new_energy: change.energy_per_distributor,
                    });
                }
                None => events.push(skipped(turn, change.id, "unknown producer")),
            }
        }

        events
    }
}

fn skipped(turn: usize, entity_id: EntityId, reason: &str) -> Event {
    Event::ChangeSkipped {
        turn,
        entity_id,
        reason: reason.to_string(),
    }
}
