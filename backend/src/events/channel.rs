//! Producer change propagation
//!
//! When a producer's output changes, the distributors drawing from it must
//! reconsider their allocation. Instead of producers holding references to
//! their subscribers, the engine publishes a notice to this queue and then
//! delivers the queue to every active distributor once per turn.
//!
//! # Delivery Semantics
//!
//! Delivery starts a new notification cycle: every distributor's
//! `producer_changed` flag is cleared first, then set again by the notices
//! that concern one of its producers. A distributor flagged in one turn is
//! therefore unflagged by the next turn's delivery unless it is notified
//! again.

use crate::models::distributor::Distributor;
use crate::models::EntityId;
use std::collections::VecDeque;

/// A message on the change channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNotice {
    /// A producer's energy per distributor changed
    ProducerChanged { producer_id: EntityId },
}

/// FIFO queue of pending change notices
///
/// # Example
/// ```
/// use energy_market_core_rs::events::ChangeChannel;
/// use energy_market_core_rs::{Distributor, EnergyChoiceStrategy};
///
/// let mut holder = Distributor::new(1, 3, 100, 10, 50, EnergyChoiceStrategy::Green);
/// holder.assign_producer(4);
/// let mut bystander = Distributor::new(2, 3, 100, 10, 50, EnergyChoiceStrategy::Green);
/// bystander.assign_producer(5);
///
/// let mut channel = ChangeChannel::new();
/// channel.publish_producer_changed(4);
///
/// let mut distributors = vec![holder, bystander];
/// assert_eq!(channel.deliver(&mut distributors), vec![1]);
/// assert!(channel.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeChannel {
    queue: VecDeque<ChangeNotice>,
}

impl ChangeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice that a producer's output changed
    pub fn publish_producer_changed(&mut self, producer_id: EntityId) {
        self.queue
            .push_back(ChangeNotice::ProducerChanged { producer_id });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending notices, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &ChangeNotice> {
        self.queue.iter()
    }

    /// Run one notification cycle over the given distributors
    ///
    /// Clears every distributor's flag, hands each queued notice to every
    /// distributor and empties the queue. Returns the IDs of the distributors
    /// left flagged, in the order given.
    pub fn deliver(&mut self, distributors: &mut [Distributor]) -> Vec<EntityId> {
        for distributor in distributors.iter_mut() {
            distributor.begin_notification_cycle();
        }

        while let Some(notice) = self.queue.pop_front() {
            match notice {
                ChangeNotice::ProducerChanged { producer_id } => {
                    for distributor in distributors.iter_mut() {
                        distributor.on_producer_changed(producer_id);
                    }
                }
            }
        }

        distributors
            .iter()
            .filter(|d| d.producer_changed())
            .map(Distributor::id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::EnergyChoiceStrategy;

    #[test]
    fn test_empty_delivery_clears_previous_flags() {
        let mut distributor = Distributor::new(1, 3, 100, 10, 50, EnergyChoiceStrategy::Price);
        assert!(distributor.producer_changed());

        let mut channel = ChangeChannel::new();
        let flagged = channel.deliver(std::slice::from_mut(&mut distributor));

        assert!(flagged.is_empty());
        assert!(!distributor.producer_changed());
    }

    #[test]
    fn test_notices_delivered_in_order_and_drained() {
        let mut channel = ChangeChannel::new();
        channel.publish_producer_changed(3);
        channel.publish_producer_changed(1);

        let pending: Vec<_> = channel.pending().copied().collect();
        assert_eq!(
            pending,
            vec![
                ChangeNotice::ProducerChanged { producer_id: 3 },
                ChangeNotice::ProducerChanged { producer_id: 1 },
            ]
        );

        channel.deliver(&mut []);
        assert!(channel.is_empty());
    }
}
