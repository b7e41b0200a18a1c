//! Contract model
//!
//! Represents a priced lease between one distributor (contractor) and one
//! consumer (contractee). Each contract has:
//! - Base price agreed at signing (i64)
//! - Remaining months
//! - Penalty (0, or `floor(1.2 × base price)` after a missed payment)
//! - Paid / cancelled flags
//!
//! # Critical Invariants
//!
//! 1. `paid` is true only when `remaining_months <= 0 && penalty == 0`
//! 2. `paid` and `cancelled` are never both true
//! 3. Both flags are monotonic: once set they stay set

use crate::models::EntityId;
use serde::{Deserialize, Serialize};

/// Engine-assigned contract identifier, unique within a run
pub type ContractId = u64;

/// Surcharge factor applied to the base price after a missed payment
const PENALTY_MARGIN: f32 = 1.2;

/// A lease between a distributor and a consumer
///
/// # Example
/// ```
/// use energy_market_core_rs::Contract;
///
/// let mut contract = Contract::new(1, 10, 20, 100, 2);
/// assert_eq!(contract.current_price(), 100);
///
/// contract.advance(false); // missed payment
/// assert_eq!(contract.penalty(), 120);
/// assert_eq!(contract.current_price(), 220);
///
/// contract.advance(true); // debt cleared
/// assert!(contract.is_paid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    id: ContractId,

    /// Distributor that issued the contract
    contractor_id: EntityId,

    /// Consumer that signed the contract
    contractee_id: EntityId,

    /// Price agreed at signing
    price: i64,

    remaining_months: i64,

    /// Outstanding surcharge, 0 when the consumer is up to date
    penalty: i64,

    paid: bool,
    cancelled: bool,
}

impl Contract {
    /// Create a new contract
    ///
    /// # Arguments
    /// * `id` - Engine-assigned contract ID
    /// * `contractor_id` - Distributor ID
    /// * `contractee_id` - Consumer ID
    /// * `price` - Monthly base price
    /// * `months` - Contract length in months
    pub fn new(
        id: ContractId,
        contractor_id: EntityId,
        contractee_id: EntityId,
        price: i64,
        months: i64,
    ) -> Self {
        Self {
            id,
            contractor_id,
            contractee_id,
            price,
            remaining_months: months,
            penalty: 0,
            paid: false,
            cancelled: false,
        }
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn contractor_id(&self) -> EntityId {
        self.contractor_id
    }

    pub fn contractee_id(&self) -> EntityId {
        self.contractee_id
    }

    /// Base price agreed at signing (without penalty)
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Price owed this month: base price plus any outstanding penalty
    pub fn current_price(&self) -> i64 {
        self.price + self.penalty
    }

    pub fn remaining_months(&self) -> i64 {
        self.remaining_months
    }

    pub fn penalty(&self) -> i64 {
        self.penalty
    }

    pub fn has_penalty(&self) -> bool {
        self.penalty != 0
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Advance the contract by one month
    ///
    /// A successful payment clears any outstanding penalty; a missed payment
    /// (re)computes the penalty from the base price. Either way one month is
    /// consumed. The contract becomes paid once no months remain and no
    /// penalty is outstanding.
    ///
    /// Cancelled or already paid contracts are left untouched.
    pub fn advance(&mut self, consumer_paid: bool) {
        if self.cancelled || self.paid {
            return;
        }

        if consumer_paid {
            self.penalty = 0;
        } else {
            self.penalty = (PENALTY_MARGIN * self.price as f32).floor() as i64;
        }
        self.remaining_months -= 1;

        if self.remaining_months <= 0 && self.penalty == 0 {
            self.paid = true;
        }
    }

    /// Cancel the contract because one party went bankrupt
    ///
    /// Irreversible. A contract that already reached `paid` stays paid.
    pub fn terminate(&mut self) {
        if !self.paid {
            self.cancelled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_month_without_penalty_only_decrements() {
        let mut contract = Contract::new(1, 1, 2, 30, 3);
        contract.advance(true);

        assert_eq!(contract.remaining_months(), 2);
        assert_eq!(contract.penalty(), 0);
        assert!(!contract.is_paid());
    }

    #[test]
    fn test_missed_payment_keeps_contract_open_at_zero_months() {
        let mut contract = Contract::new(1, 1, 2, 50, 1);
        contract.advance(false);

        assert_eq!(contract.remaining_months(), 0);
        assert_eq!(contract.penalty(), 60);
        assert!(!contract.is_paid());

        contract.advance(true);
        assert_eq!(contract.remaining_months(), -1);
        assert!(contract.is_paid());
    }

    #[test]
    fn test_penalty_is_floored() {
        let mut contract = Contract::new(1, 1, 2, 7, 5);
        contract.advance(false);

        // 1.2 * 7 = 8.4
        assert_eq!(contract.penalty(), 8);
        assert_eq!(contract.current_price(), 15);
    }

    #[test]
    fn test_terminate_is_irreversible() {
        let mut contract = Contract::new(1, 1, 2, 10, 2);
        contract.terminate();
        contract.advance(true);

        assert!(contract.is_cancelled());
        assert!(!contract.is_paid());
        assert_eq!(contract.remaining_months(), 2);
    }

    #[test]
    fn test_terminate_after_paid_keeps_flags_exclusive() {
        let mut contract = Contract::new(1, 1, 2, 10, 1);
        contract.advance(true);
        contract.terminate();

        assert!(contract.is_paid());
        assert!(!contract.is_cancelled());
    }
}
