//! Consumer model
//!
//! A household buying energy. Each consumer has:
//! - Budget (i64), credited with a monthly income
//! - At most one active contract with a distributor
//! - Bankrupt flag (terminal)
//!
//! The consumer holds only the ID of its contract; the contract itself lives
//! in the market state's contract book and is handed in by the engine.

use crate::models::contract::{Contract, ContractId};
use crate::models::EntityId;
use serde::{Deserialize, Serialize};

/// Result of a consumer's monthly lease payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseOutcome {
    /// Full current price paid (any previous penalty cleared)
    Paid { amount: i64 },

    /// Payment missed for the first time; a penalty was applied
    Deferred { penalty: i64 },

    /// Payment missed while a penalty was already outstanding
    Bankrupt,

    /// Contract cancelled by the distributor's bankruptcy; nothing owed
    Cancelled,

    /// No active contract this month
    NoContract,
}

/// A household participating in the market
///
/// # Example
/// ```
/// use energy_market_core_rs::{Consumer, Contract, LeaseOutcome};
///
/// let mut consumer = Consumer::new(1, 100, 50);
/// let mut contract = Contract::new(7, 3, 1, 30, 12);
/// consumer.sign_contract(contract.id());
///
/// consumer.advance_budget();
/// assert_eq!(consumer.advance_lease(Some(&mut contract)), LeaseOutcome::Paid { amount: 30 });
/// assert_eq!(consumer.budget(), 120);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumer {
    id: EntityId,
    budget: i64,
    monthly_income: i64,
    contract: Option<ContractId>,
    is_bankrupt: bool,
}

impl Consumer {
    /// Create a new consumer without a contract
    pub fn new(id: EntityId, budget: i64, monthly_income: i64) -> Self {
        Self {
            id,
            budget,
            monthly_income,
            contract: None,
            is_bankrupt: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn monthly_income(&self) -> i64 {
        self.monthly_income
    }

    pub fn is_bankrupt(&self) -> bool {
        self.is_bankrupt
    }

    /// ID of the active contract, if any
    pub fn contract_id(&self) -> Option<ContractId> {
        self.contract
    }

    pub fn has_contract(&self) -> bool {
        self.contract.is_some()
    }

    /// Attach a freshly signed contract
    pub fn sign_contract(&mut self, contract_id: ContractId) {
        self.contract = Some(contract_id);
    }

    /// Drop the reference to the active contract
    pub fn drop_contract(&mut self) {
        self.contract = None;
    }

    /// Drop the active contract if it has been fully paid
    ///
    /// Returns true if a reference was dropped.
    pub fn purge_paid_contract(&mut self, contract: &Contract) -> bool {
        self.purge_contract_if(contract, Contract::is_paid)
    }

    /// Drop the active contract if it was cancelled
    ///
    /// Returns true if a reference was dropped.
    pub fn purge_cancelled_contract(&mut self, contract: &Contract) -> bool {
        self.purge_contract_if(contract, Contract::is_cancelled)
    }

    fn purge_contract_if(&mut self, contract: &Contract, predicate: fn(&Contract) -> bool) -> bool {
        if self.contract == Some(contract.id()) && predicate(contract) {
            self.contract = None;
            return true;
        }
        false
    }

    /// Credit the monthly income
    pub fn advance_budget(&mut self) {
        self.budget += self.monthly_income;
    }

    /// Pay this month's lease
    ///
    /// If the current price exceeds the budget the payment is missed: a first
    /// miss puts a penalty on the contract (one grace period), a second miss
    /// while the penalty is outstanding bankrupts the consumer and cancels the
    /// contract. Otherwise the current price is deducted and the contract
    /// advanced as paid.
    ///
    /// A cancelled contract still referenced before the cancelled purge is
    /// not billed.
    pub fn advance_lease(&mut self, contract: Option<&mut Contract>) -> LeaseOutcome {
        let Some(contract) = contract else {
            return LeaseOutcome::NoContract;
        };
        if contract.is_cancelled() {
            return LeaseOutcome::Cancelled;
        }

        let price = contract.current_price();
        if price > self.budget {
            if contract.has_penalty() {
                self.is_bankrupt = true;
                contract.terminate();
                return LeaseOutcome::Bankrupt;
            }
            contract.advance(false);
            return LeaseOutcome::Deferred {
                penalty: contract.penalty(),
            };
        }

        self.budget -= price;
        contract.advance(true);
        LeaseOutcome::Paid { amount: price }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_missed_payment_is_grace_period() {
        let mut consumer = Consumer::new(1, 10, 0);
        let mut contract = Contract::new(1, 5, 1, 40, 3);
        consumer.sign_contract(contract.id());

        let outcome = consumer.advance_lease(Some(&mut contract));

        assert_eq!(outcome, LeaseOutcome::Deferred { penalty: 48 });
        assert!(!consumer.is_bankrupt());
        assert_eq!(consumer.budget(), 10);
        assert_eq!(contract.remaining_months(), 2);
    }

    #[test]
    fn test_lease_without_contract_is_noop() {
        let mut consumer = Consumer::new(1, 10, 5);
        consumer.advance_budget();

        assert_eq!(consumer.advance_lease(None), LeaseOutcome::NoContract);
        assert_eq!(consumer.budget(), 15);
    }

    #[test]
    fn test_cancelled_contract_is_not_billed() {
        let mut consumer = Consumer::new(1, 0, 0);
        let mut contract = Contract::new(1, 5, 1, 40, 3);
        consumer.sign_contract(contract.id());
        contract.terminate();

        assert_eq!(consumer.advance_lease(Some(&mut contract)), LeaseOutcome::Cancelled);
        assert!(!consumer.is_bankrupt());
        assert_eq!(consumer.budget(), 0);
        assert_eq!(contract.penalty(), 0);
        assert_eq!(contract.remaining_months(), 3);
    }

    #[test]
    fn test_purge_ignores_foreign_contract() {
        let mut consumer = Consumer::new(1, 10, 5);
        consumer.sign_contract(3);

        let mut other = Contract::new(4, 5, 2, 1, 1);
        other.advance(true);

        assert!(!consumer.purge_paid_contract(&other));
        assert_eq!(consumer.contract_id(), Some(3));
    }
}
