//! Quantity strategy: most energy per distributor first, then lowest ID.

use crate::models::producer::Producer;
use std::cmp::Ordering;

pub fn compare(a: &Producer, b: &Producer) -> Ordering {
    b.energy_per_distributor()
        .cmp(&a.energy_per_distributor())
        .then_with(|| a.id().cmp(&b.id()))
}
