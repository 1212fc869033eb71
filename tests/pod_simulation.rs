//! Integration tests for mission encounter simulation

use std::path::Path;

use pod_sim::core::config::STRATEGY_AI_SECTION;
use pod_sim::ini::{load_config_file, parse_config, parse_struct_record, ConfigDocument};
use pod_sim::simulation::{run_distribution, run_simulation, PodSimulator};
use pod_sim::tables::{BaseStats, GameCore};
use pod_sim::{MissionKind, SimConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn strategy(body: &str) -> ConfigDocument {
    parse_config(format!("[{}]\n{}", STRATEGY_AI_SECTION, body).as_str())
}

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn mission(kind: MissionKind, month: u32, difficulty: i64) -> SimConfig {
    SimConfig {
        month,
        difficulty,
        ..SimConfig::new(kind)
    }
}

#[test]
fn test_fixed_bounds_give_exact_pod_count() {
    let document = strategy(
        "AbductionPodNumbers=(MinPods=3,MaxPods=3)\n\
         AbductionPodTypes=(ID=EPodTypeMod_Soldier,TypeChance=100)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,SupportAlien1=eChar_Sectoid,PodChance=100)\n",
    );
    let stats = BaseStats::default();

    for seed in 0..25 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sim = mission(MissionKind::Abduction, 0, 2);
        let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
        assert_eq!(result.pods.len(), 3);
        assert!(result.pods.iter().all(|p| p.category == "Soldier"));
        let indices: Vec<usize> = result.pods.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}

#[test]
fn test_pod_limit_caps_pods_per_run() {
    let document = strategy(
        "AbductionPodNumbers=(MinPods=10,MaxPods=10)\n\
         AbductionPodTypes=(ID=EPodTypeMod_Soldier,TypeChance=100)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=100,PodLimit=2)\n",
    );
    let stats = BaseStats::default();

    for seed in 0..25 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sim = mission(MissionKind::Abduction, 0, 2);
        let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
        assert!(result.pods.len() <= 2);
        assert_eq!(result.pod_slots, 10);
    }
}

#[test]
fn test_difficulty_filter_excludes_hard_groups() {
    let document = strategy(
        "AbductionPodNumbers=(MinPods=4,MaxPods=4)\n\
         PossibleSoldiers=(MainAlien=eChar_Muton,PodChance=100,PodDifficulty=5)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=1,PodDifficulty=0)\n",
    );
    let stats = BaseStats::default();

    for seed in 0..25 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sim = mission(MissionKind::Abduction, 0, 2);
        let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
        assert_eq!(result.pods.len(), 4);
        for pod in &result.pods {
            assert_eq!(pod.leader().unwrap().name, "Sectoid");
        }
    }
}

#[test]
fn test_difficulty_decrease_keeps_hard_groups_possible() {
    let document = strategy(
        "DiffDecreaseProbability=True\n\
         AbductionPodNumbers=(MinPods=4,MaxPods=4)\n\
         PossibleSoldiers=(MainAlien=eChar_Muton,PodChance=100,PodDifficulty=3)\n",
    );
    let stats = BaseStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    // 100 / (2 * 1) = 50 stays positive, so the only group is still drawn
    let sim = mission(MissionKind::Abduction, 0, 2);
    let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
    assert_eq!(result.pods.len(), 4);
}

#[test]
fn test_stat_bounds_with_research_upgrades() {
    let document = strategy(
        "AbductionPodNumbers=(MinPods=1,MaxPods=1)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,SupportAlien1=eChar_Sectoid,PodChance=100,\
         MinAliens=3,MaxAliens=3)\n\
         EnableAlienResources=False\n",
    );
    let core = GameCore::from_document(&parse_config(
        "[XComGame.XGCharacter]\n\
         Characters=(iType=eChar_Sectoid, HP=3, Offense=65, Will=10)\n\
         BalanceMods_Hard=(eType=eChar_Sectoid, iCritHit=15, iHP=2, iAim=10)\n",
    ));

    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = run_simulation(
            &document,
            &core.base_stats,
            &core.upgrades,
            &mission(MissionKind::Abduction, 0, 2),
            &mut rng,
        );
        for unit in result.pods.iter().flat_map(|p| &p.units) {
            assert!((4..=6).contains(&unit.hp), "hp {}", unit.hp);
            assert!((73..=77).contains(&unit.aim), "aim {}", unit.aim);
            assert_eq!(unit.will, 10);
        }
    }
}

#[test]
fn test_empty_config_still_runs() {
    let document = parse_config(None::<&str>);
    let stats = BaseStats::default();

    for kind in MissionKind::ALL {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let result = run_simulation(&document, &stats, &[], &mission(kind, 3, 1), &mut rng);
        // Every slot draws from an empty pool
        assert!(result.pods.is_empty());
    }
    assert!(parse_struct_record("not a struct").is_empty());
}

#[test]
fn test_ufo_missions_end_with_commander() {
    let document = load_config_file(&fixture("StrategyAI.ini")).unwrap();
    let stats = BaseStats::default();

    for kind in [MissionKind::Ufo, MissionKind::BigUfo] {
        for seed in 0..25 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sim = SimConfig {
                ship_size: Some(1),
                ..mission(kind, 2, 1)
            };
            let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
            let last = result.pods.last().unwrap();
            assert_eq!(last.category, "Commander");
            assert!(last.is_leader_pod);
            assert_eq!(last.index, result.pod_slots);
        }
    }
}

#[test]
fn test_same_seed_same_encounter() {
    let document = load_config_file(&fixture("StrategyAI.ini")).unwrap();
    let core = GameCore::load(&fixture("GameCore.ini")).unwrap();
    let simulator = PodSimulator::new(&document, &core.base_stats, &core.upgrades)
        .with_perks(core.perks.clone());
    let sim = SimConfig {
        resources: 120,
        ..mission(MissionKind::Terror, 7, 2)
    };

    let first = simulator.run(&sim, &mut ChaCha8Rng::seed_from_u64(42));
    let second = simulator.run(&sim, &mut ChaCha8Rng::seed_from_u64(42));
    assert_eq!(first, second);
    assert_eq!(first.to_json(), second.to_json());
}

#[test]
fn test_simulation_leaves_document_untouched() {
    let document = load_config_file(&fixture("StrategyAI.ini")).unwrap();
    let before = document.clone();
    let stats = BaseStats::default();

    let simulator = PodSimulator::new(&document, &stats, &[]);
    let report = run_distribution(&simulator, &mission(MissionKind::Abduction, 8, 1), 20, 5);
    assert_eq!(report.runs, 20);
    assert_eq!(document, before);
}

#[test]
fn test_leaders_never_exceed_level_seven() {
    let document = load_config_file(&fixture("StrategyAI.ini")).unwrap();
    let stats = BaseStats::default();
    let simulator = PodSimulator::new(&document, &stats, &[]);

    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = simulator.run(&mission(MissionKind::Abduction, 40, 3), &mut rng);
        for pod in &result.pods {
            assert!(pod.leader_level <= 7);
            assert!(pod.units.len() <= 8);
            assert_eq!(pod.units.iter().filter(|u| u.is_leader).count(), 1);
        }
    }
}

#[test]
fn test_month_modifiers_raise_pod_count() {
    let document = load_config_file(&fixture("StrategyAI.ini")).unwrap();
    let stats = BaseStats::default();
    let simulator = PodSimulator::new(&document, &stats, &[]);

    let first = mission(MissionKind::Abduction, 0, 2);
    let sixth = mission(MissionKind::Abduction, 6, 2);
    for seed in 0..25 {
        let early = simulator.run(&first, &mut ChaCha8Rng::seed_from_u64(seed));
        let late = simulator.run(&sixth, &mut ChaCha8Rng::seed_from_u64(seed));
        assert!((2..=3).contains(&early.pod_slots));
        assert!((3..=4).contains(&late.pod_slots));
    }
}

#[test]
fn test_scenario_file_drives_simulation() {
    let sim =
        SimConfig::from_toml_str("mission = \"UFO\"\nmonth = 4\nship_size = 2\nlanded = false\n")
            .unwrap();
    assert_eq!(sim.mission, MissionKind::Ufo);
    assert_eq!(sim.effective_difficulty(), 2);
    assert!(!sim.landed);

    let document = load_config_file(&fixture("StrategyAI.ini")).unwrap();
    let stats = BaseStats::default();
    let result = run_simulation(&document, &stats, &[], &sim, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(result.research, 112);
}

#[test]
fn test_extreme_numbers_never_panic() {
    let stats = BaseStats::default();
    let bodies = [
        "AbductionPodNumbers=(MinPods=3,MaxPods=3)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=100,\
         MinAliens=-9223372036854775808,MaxAliens=3)\n",
        "AbductionPodNumbers=(MinPods=3,MaxPods=3)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=1e30)\n\
         PossibleSoldiers=(MainAlien=eChar_Muton,PodChance=1e30)\n",
        "AbductionPodNumbers=(MinPods=-1e30,MaxPods=1)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=100)\n",
        "AbductionPodNumbers=(MinPods=1e30,MaxPods=1e30)\n\
         AbductionPodTypes=(ID=EPodTypeMod_Soldier,TypeChance=1e30)\n\
         AbductionPodTypes=(ID=EPodTypeMod_Elite,TypeChance=1e30)\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=100)\n",
    ];

    for body in bodies {
        let document = strategy(body);
        let sim = SimConfig {
            resources: u32::MAX,
            ..mission(MissionKind::Abduction, 0, i64::MAX)
        };
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
            assert!(result.pod_slots <= 64);
            assert!(result.pods.iter().all(|p| p.units.len() <= 8));
        }
    }
}

#[test]
fn test_ship_type_picks_big_ufo_tables() {
    let document = strategy(
        "UFOPodNumbers=(MinPods=1,MaxPods=1)\n\
         BigUFOPodNumbers=(MinPods=5,MaxPods=5)\n\
         ShipSizeMultiplier=0\n\
         PossibleSoldiers=(MainAlien=eChar_Sectoid,PodChance=100)\n\
         PossibleCommanders=(MainAlien=eChar_SectoidCommander,PodChance=100)\n",
    );
    let stats = BaseStats::default();

    for (ship_type, slots) in [("eShip_UFOLargeScout", 1), ("eShip_UFOSupply", 5)] {
        let sim = SimConfig {
            ship_type: Some(ship_type.to_string()),
            ..mission(MissionKind::Ufo, 0, 1)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result = run_simulation(&document, &stats, &[], &sim, &mut rng);
        assert_eq!(result.pod_slots, slots, "{}", ship_type);
        assert_eq!(result.mission, MissionKind::Ufo);
        assert_eq!(result.pods.last().unwrap().category, "Commander");
    }
}
