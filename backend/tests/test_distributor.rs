//! Tests for Distributor model
//!
//! Covers pricing (production and contract cost), monthly costs, lease
//! collection and bankruptcy.

use energy_market_core_rs::{Contract, Distributor, EnergyChoiceStrategy, EnergyType, Producer};

fn producers() -> Vec<Producer> {
    vec![
        Producer::new(1, EnergyType::Wind, 3, 0.3, 500, 1),
        Producer::new(2, EnergyType::Coal, 3, 0.15, 300, 1),
    ]
}

#[test]
fn test_distributor_new() {
    let distributor = Distributor::new(7, 12, 1_000, 200, 800, EnergyChoiceStrategy::Quantity);

    assert_eq!(distributor.id(), 7);
    assert_eq!(distributor.contract_length(), 12);
    assert_eq!(distributor.budget(), 1_000);
    assert_eq!(distributor.infrastructure_cost(), 200);
    assert_eq!(distributor.energy_needed_kw(), 800);
    assert_eq!(distributor.strategy(), EnergyChoiceStrategy::Quantity);
    assert!(distributor.producer_changed());
    assert!(!distributor.is_bankrupt());
}

#[test]
fn test_production_cost_from_producers() {
    let mut distributor = Distributor::new(1, 12, 1_000, 200, 800, EnergyChoiceStrategy::Green);

    distributor.update_production_cost(&producers());

    // (500 * 0.3 + 300 * 0.15) / 10 = 19.5
    assert_eq!(distributor.production_cost(), 19);
}

#[test]
fn test_contract_cost_without_contracts() {
    let mut distributor = Distributor::new(1, 12, 1_000, 200, 800, EnergyChoiceStrategy::Green);
    distributor.update_production_cost(&producers());
    distributor.update_contract_cost();

    // 200 + 19 + floor(3.8)
    assert_eq!(distributor.contract_cost(), 222);
}

#[test]
fn test_contract_cost_with_contracts() {
    let mut distributor = Distributor::new(1, 12, 1_000, 200, 800, EnergyChoiceStrategy::Green);
    distributor.update_production_cost(&producers());
    for id in 1..=3 {
        distributor.sign_contract(id);
    }
    distributor.update_contract_cost();

    // floor(200 / 3) + 19 + 3
    assert_eq!(distributor.contract_cost(), 88);
}

#[test]
fn test_monthly_costs_and_income() {
    let mut distributor = Distributor::new(1, 12, 1_000, 200, 800, EnergyChoiceStrategy::Green);
    distributor.update_production_cost(&producers());

    let mut first = Contract::new(1, 1, 10, 90, 12);
    let mut second = Contract::new(2, 1, 11, 80, 12);
    distributor.sign_contract(first.id());
    distributor.sign_contract(second.id());

    distributor.advance_budget();
    assert_eq!(distributor.budget(), 1_000 - 200 - 19 * 2);

    let bankrupt = distributor.advance_lease(vec![&mut first, &mut second]);
    assert!(!bankrupt);
    assert_eq!(distributor.budget(), 762 + 170);
}

#[test]
fn test_bankruptcy_cancels_contracts() {
    let mut distributor = Distributor::new(1, 12, 100, 500, 0, EnergyChoiceStrategy::Price);
    let mut contract = Contract::new(1, 1, 10, 90, 12);
    distributor.sign_contract(contract.id());

    distributor.advance_budget();
    assert!(distributor.advance_lease(vec![&mut contract]));

    assert!(distributor.is_bankrupt());
    assert_eq!(distributor.budget(), -310);
    assert!(contract.is_cancelled());
}

#[test]
fn test_drop_contracts_where() {
    let mut distributor = Distributor::new(1, 12, 100, 0, 0, EnergyChoiceStrategy::Price);
    for id in [4, 5, 6, 7] {
        distributor.sign_contract(id);
    }

    let dropped = distributor.drop_contracts_where(|id| id % 2 == 0);

    assert_eq!(dropped, vec![4, 6]);
    assert_eq!(distributor.contract_ids(), &[5, 7]);
}
