//! Property tests for market invariants
//!
//! - Contract flags are exclusive and monotonic
//! - No producer ever serves more than its maximum number of distributors
//! - Every strategy is a total order
//! - Live contracts are always referenced and runs are reproducible

use energy_market_core_rs::events::TurnChanges;
use energy_market_core_rs::orchestrator::report_hash;
use energy_market_core_rs::{
    ConsumerConfig, Contract, DistributorConfig, EnergyChoiceStrategy, EnergyType, Orchestrator,
    OrchestratorConfig, Producer, ProducerConfig,
};
use proptest::prelude::*;

const ENERGY_TYPES: [EnergyType; 5] = [
    EnergyType::Wind,
    EnergyType::Solar,
    EnergyType::Hydro,
    EnergyType::Coal,
    EnergyType::Nuclear,
];

const STRATEGIES: [EnergyChoiceStrategy; 3] = [
    EnergyChoiceStrategy::Green,
    EnergyChoiceStrategy::Price,
    EnergyChoiceStrategy::Quantity,
];

#[derive(Debug, Clone, Copy)]
enum ContractAction {
    Pay,
    Miss,
    Terminate,
}

fn contract_action() -> impl Strategy<Value = ContractAction> {
    prop_oneof![
        Just(ContractAction::Pay),
        Just(ContractAction::Miss),
        Just(ContractAction::Terminate),
    ]
}

fn producers_strategy() -> impl Strategy<Value = Vec<(usize, usize, f64, i64)>> {
    prop::collection::vec((0usize..5, 1usize..4, 0.0f64..2.0, 0i64..400), 1..6)
}

fn market_config(
    number_of_turns: usize,
    consumers: &[(i64, i64)],
    distributors: &[(i64, i64, i64, usize)],
    producers: &[(usize, usize, f64, i64)],
) -> OrchestratorConfig {
    OrchestratorConfig {
        number_of_turns,
        consumers: consumers
            .iter()
            .enumerate()
            .map(|(id, &(initial_budget, monthly_income))| ConsumerConfig {
                id: id as u32,
                initial_budget,
                monthly_income,
            })
            .collect(),
        distributors: distributors
            .iter()
            .enumerate()
            .map(
                |(id, &(initial_budget, infrastructure_cost, energy_needed_kw, strategy))| {
                    DistributorConfig {
                        id: id as u32,
                        contract_length: 3,
                        initial_budget,
                        infrastructure_cost,
                        energy_needed_kw,
                        strategy: STRATEGIES[strategy],
                    }
                },
            )
            .collect(),
        producers: producers
            .iter()
            .enumerate()
            .map(
                |(id, &(energy_type, max_distributors, price_kw, energy_per_distributor))| {
                    ProducerConfig {
                        id: id as u32,
                        energy_type: ENERGY_TYPES[energy_type],
                        max_distributors,
                        price_kw,
                        energy_per_distributor,
                    }
                },
            )
            .collect(),
    }
}

fn updates(number_of_turns: usize, producer_count: usize, changes: &[(usize, i64)]) -> Vec<TurnChanges> {
    (0..number_of_turns)
        .map(|turn| match changes.get(turn) {
            Some(&(producer, energy)) => {
                TurnChanges::empty().with_producer_change((producer % producer_count) as u32, energy)
            }
            None => TurnChanges::empty(),
        })
        .collect()
}

proptest! {
    #[test]
    fn contract_flags_exclusive_and_monotonic(
        price in 0i64..1_000,
        months in 0i64..6,
        actions in prop::collection::vec(contract_action(), 0..12),
    ) {
        let mut contract = Contract::new(1, 1, 2, price, months);
        let mut was_paid = false;
        let mut was_cancelled = false;

        for action in actions {
            match action {
                ContractAction::Pay => contract.advance(true),
                ContractAction::Miss => contract.advance(false),
                ContractAction::Terminate => contract.terminate(),
            }

            prop_assert!(!(contract.is_paid() && contract.is_cancelled()));
            prop_assert!(!was_paid || contract.is_paid());
            prop_assert!(!was_cancelled || contract.is_cancelled());
            was_paid = contract.is_paid();
            was_cancelled = contract.is_cancelled();
        }
    }

    #[test]
    fn strategies_are_total_orders(producers in producers_strategy()) {
        let base: Vec<Producer> = producers
            .iter()
            .enumerate()
            .map(|(id, &(energy_type, max, price, energy))| {
                Producer::new(id as u32, ENERGY_TYPES[energy_type], max, price, energy, 1)
            })
            .collect();

        for strategy in STRATEGIES {
            let mut forward = base.clone();
            let mut backward: Vec<Producer> = base.iter().rev().cloned().collect();
            strategy.sort_producers(&mut forward);
            strategy.sort_producers(&mut backward);

            let forward_ids: Vec<u32> = forward.iter().map(Producer::id).collect();
            let backward_ids: Vec<u32> = backward.iter().map(Producer::id).collect();
            prop_assert_eq!(forward_ids, backward_ids);
        }
    }

    #[test]
    fn producers_never_exceed_capacity(
        number_of_turns in 1usize..6,
        consumers in prop::collection::vec((0i64..300, 0i64..100), 0..5),
        distributors in prop::collection::vec((0i64..2_000, 0i64..200, 0i64..800, 0usize..3), 1..5),
        producers in producers_strategy(),
        changes in prop::collection::vec((0usize..5, 0i64..400), 0..6),
    ) {
        let config = market_config(number_of_turns, &consumers, &distributors, &producers);
        let updates = updates(number_of_turns, producers.len(), &changes);

        let mut orchestrator = Orchestrator::new(config).unwrap();
        let report = orchestrator.run(&updates).unwrap();

        for producer in &report.energy_producers {
            prop_assert_eq!(producer.monthly_stats.len(), number_of_turns);
            for stat in &producer.monthly_stats {
                prop_assert!(stat.distributors_ids.len() <= producer.max_distributors);
            }
        }
    }

    #[test]
    fn live_contracts_always_referenced(
        number_of_turns in 1usize..6,
        consumers in prop::collection::vec((-50i64..300, 0i64..100), 1..5),
        distributors in prop::collection::vec((-100i64..500, 0i64..200, 0i64..800, 0usize..3), 1..4),
        producers in producers_strategy(),
    ) {
        let config = market_config(number_of_turns, &consumers, &distributors, &producers);
        let mut orchestrator = Orchestrator::new(config).unwrap();
        orchestrator.run_bootstrap().unwrap();

        while !orchestrator.is_finished() {
            orchestrator.run_turn(&TurnChanges::empty()).unwrap();
            let state = orchestrator.state();

            for consumer in state.consumers() {
                if let Some(id) = consumer.contract_id() {
                    prop_assert!(state.contract(id).is_some());
                }
            }
            for distributor in state.distributors() {
                for id in distributor.contract_ids() {
                    prop_assert!(state.contract(*id).is_some());
                }
            }
            for contract in state.contracts() {
                prop_assert!(!contract.is_cancelled());
            }
            prop_assert!(state.bankrupt_distributors().iter().all(|d| d.contract_ids().is_empty()));
        }
    }

    #[test]
    fn identical_input_identical_report(
        number_of_turns in 1usize..5,
        consumers in prop::collection::vec((0i64..300, 0i64..100), 0..4),
        distributors in prop::collection::vec((0i64..1_000, 0i64..200, 0i64..800, 0usize..3), 1..4),
        producers in producers_strategy(),
        changes in prop::collection::vec((0usize..5, 0i64..400), 0..5),
    ) {
        let updates = updates(number_of_turns, producers.len(), &changes);
        let run = || {
            let config = market_config(number_of_turns, &consumers, &distributors, &producers);
            let mut orchestrator = Orchestrator::new(config).unwrap();
            report_hash(&orchestrator.run(&updates).unwrap()).unwrap()
        };

        prop_assert_eq!(run(), run());
    }
}
