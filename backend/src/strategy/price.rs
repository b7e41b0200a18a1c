//! Price strategy
//!
//! Cheapest producers first, then the most energy per distributor, then the
//! lowest ID.

use crate::models::producer::Producer;
use std::cmp::Ordering;

pub fn compare(a: &Producer, b: &Producer) -> Ordering {
    a.price_kw()
        .total_cmp(&b.price_kw())
        .then_with(|| b.energy_per_distributor().cmp(&a.energy_per_distributor()))
        .then_with(|| a.id().cmp(&b.id()))
}
