//! End-to-end checks of the castability engine
//! Worked scenarios plus properties over seeded random instances

use crate::card::{parse_cost, parse_pool_file, parse_sources, LandDatabase, ManaSource, Symbol};
use crate::castable::{
    is_castable, BoundKind, CastError, Caster, CompatibilityMatrix, CompatibilityRules,
    StandardRules, Strategy,
};
use crate::config::CastConfig;
use crate::rng::InstanceRng;
use crate::simulation::crossval::{random_instance, CrossvalParams};

fn castable_by_all(sources: &str, cost: &str) -> bool {
    let sources = parse_sources(sources).unwrap();
    let cost = parse_cost(cost).unwrap();
    let mut caster = Caster::new();

    let answers: Vec<bool> = Strategy::ALL
        .iter()
        .map(|&s| caster.solve_with(s, &sources, &cost).unwrap().is_some())
        .collect();
    assert!(
        answers.iter().all(|a| *a == answers[0]),
        "strategies disagree: {:?}",
        answers
    );
    answers[0]
}

fn small_params() -> CrossvalParams {
    CrossvalParams {
        max_sources: 7,
        max_cost: 6,
        ..Default::default()
    }
}

#[test]
fn test_worked_example_is_castable() {
    assert!(castable_by_all("BR,R,B,W,W,R", "WRWRB"));
}

#[test]
fn test_one_white_source_cannot_pay_two_white() {
    assert!(!castable_by_all("W", "WW"));
}

#[test]
fn test_nothing_pays_nothing() {
    assert!(castable_by_all("", ""));
}

#[test]
fn test_empty_cost_with_lands() {
    assert!(castable_by_all("W", ""));
}

#[test]
fn test_generic_source_pays_colored_pip() {
    assert!(castable_by_all("1", "B"));

    let sources = parse_sources("1").unwrap();
    let cost = parse_cost("B").unwrap();
    let mut strict = Caster::new().with_rules(StandardRules::strict());
    assert_eq!(strict.is_castable(&sources, &cost), Ok(false));
}

#[test]
fn test_pool_file_end_to_end() {
    let db = LandDatabase::from_file("lands.json").expect("Failed to load lands");
    let sources = parse_pool_file("pool.txt", &db).expect("Failed to parse pool");
    let cost = parse_cost("WRWRB").unwrap();

    let assignment = Caster::new()
        .find_assignment(&sources, &cost)
        .unwrap()
        .expect("pool should pay the worked example");
    assert!(assignment.is_valid_for(&CompatibilityMatrix::build(
        &sources,
        &cost,
        &StandardRules::default()
    )));
}

#[test]
fn test_vacuous_truth_for_any_sources() {
    let mut rng = InstanceRng::new(Some(3));
    for _ in 0..50 {
        let count = rng.random_range(12);
        let sources: Vec<ManaSource> = (0..count).map(|_| rng.source(3, 0.2)).collect();
        for strategy in Strategy::ALL {
            let result = Caster::new().solve_with(strategy, &sources, &[]);
            assert_eq!(result.map(|a| a.map(|a| a.len())), Ok(Some(0)));
        }
    }
}

#[test]
fn test_strategies_agree_on_random_instances() {
    let params = small_params();
    for seed in 0..500 {
        let instance = random_instance(&mut InstanceRng::new(Some(seed)), &params);
        let mut caster = Caster::new();
        let sat = caster
            .solve_with(Strategy::Sat, &instance.sources, &instance.cost)
            .unwrap()
            .is_some();
        let sdr = caster
            .solve_with(Strategy::Sdr, &instance.sources, &instance.cost)
            .unwrap()
            .is_some();
        assert_eq!(sat, sdr, "seed {} disagrees: {:?}", seed, instance);
    }
}

#[test]
fn test_extracted_assignments_are_valid() {
    let params = small_params();
    let rules = StandardRules::default();
    for seed in 0..300 {
        let instance = random_instance(&mut InstanceRng::new(Some(seed)), &params);
        let matrix = CompatibilityMatrix::build(&instance.sources, &instance.cost, &rules);

        if let Some(assignment) = Caster::new()
            .solve_sat(&instance.sources, &instance.cost)
            .unwrap()
        {
            assert!(assignment.is_injective(), "seed {}", seed);
            for (position, source) in assignment.pairs() {
                assert!(
                    rules.can_supply(&instance.sources[source], instance.cost[position]),
                    "seed {}: source {} cannot pay position {}",
                    seed,
                    source,
                    position
                );
            }
            assert!(assignment.is_valid_for(&matrix));
        }
    }
}

#[test]
fn test_adding_a_source_keeps_castable() {
    let params = CrossvalParams {
        max_sources: 8,
        ..small_params()
    };
    let mut extra = InstanceRng::new(Some(99));
    for seed in 0..300 {
        let mut instance = random_instance(&mut InstanceRng::new(Some(seed)), &params);
        if !is_castable(&instance.sources, &instance.cost).unwrap() {
            continue;
        }

        let at = extra.random_range(instance.sources.len() + 1);
        instance.sources.insert(at, extra.source(2, 0.1));
        assert_eq!(
            is_castable(&instance.sources, &instance.cost),
            Ok(true),
            "seed {} lost castability",
            seed
        );
    }
}

#[test]
fn test_swapping_same_symbol_positions() {
    let sources = parse_sources("BR,R,B,W,W,R").unwrap();
    let cost = parse_cost("WRWRB").unwrap();
    let matrix = CompatibilityMatrix::build(&sources, &cost, &StandardRules::default());

    for strategy in Strategy::ALL {
        let assignment = Caster::new()
            .solve_with(strategy, &sources, &cost)
            .unwrap()
            .unwrap();

        for a in 0..cost.len() {
            for b in a + 1..cost.len() {
                if cost[a] != cost[b] {
                    continue;
                }
                let mut swapped = assignment.clone();
                swapped.swap_positions(a, b);
                assert!(swapped.is_valid_for(&matrix), "{} swap {}<->{}", strategy, a, b);
            }
        }
    }
}

#[test]
fn test_more_sources_than_the_encoding_supports() {
    let sources = parse_sources("W,W,W,W,W,W,W,W,W,W,W").unwrap();
    let cost = parse_cost("W").unwrap();

    assert_eq!(
        is_castable(&sources, &cost),
        Err(CastError::InputOutOfBounds {
            what: BoundKind::Sources,
            len: 11,
            max: 10
        })
    );
    // the search strategies have no encoding bound
    let mut caster = Caster::new();
    assert!(caster
        .solve_with(Strategy::Sdr, &sources, &cost)
        .unwrap()
        .is_some());
}

#[test]
fn test_config_drives_caster() {
    let config = CastConfig::from_json(
        r#"{"strategy": "matching", "generic_source_is_wildcard": false, "max_positions": 12}"#,
    )
    .unwrap();
    let mut caster = Caster::from_config(&config);
    assert_eq!(caster.strategy(), Strategy::Matching);

    let sources = parse_sources("1").unwrap();
    assert_eq!(caster.is_castable(&sources, &[Symbol::Generic]), Ok(true));
    assert_eq!(caster.is_castable(&sources, &parse_cost("G").unwrap()), Ok(false));

    // eleven pips fit the widened position bound
    let two = parse_sources("G,G").unwrap();
    let cost = parse_cost("GGGGGGGGGGG").unwrap();
    let mut sat = Caster::from_config(&config).with_strategy(Strategy::Sat);
    assert_eq!(sat.is_castable(&two, &cost), Ok(false));
    assert!(Caster::new().is_castable(&two, &cost).is_err());
}
