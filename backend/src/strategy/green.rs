//! Green strategy
//!
//! Renewable producers first; among equals the cheapest, then the one
//! handing out the most energy, then the lowest ID.

use crate::models::producer::Producer;
use std::cmp::Ordering;

pub fn compare(a: &Producer, b: &Producer) -> Ordering {
    b.is_renewable()
        .cmp(&a.is_renewable())
        .then_with(|| a.price_kw().total_cmp(&b.price_kw()))
        .then_with(|| b.energy_per_distributor().cmp(&a.energy_per_distributor()))
        .then_with(|| a.id().cmp(&b.id()))
}
