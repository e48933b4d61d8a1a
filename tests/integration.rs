//! Integration tests for evolvenet

use evolvenet::config::{Config, ConfigError};
use evolvenet::neural::{Activation, Brain, Evolvable, Group, Network, NetworkError, Sample};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn xor_dataset() -> Vec<Sample> {
    vec![
        Sample::new(vec![0.0, 0.0], vec![0.0]),
        Sample::new(vec![0.0, 1.0], vec![1.0]),
        Sample::new(vec![1.0, 0.0], vec![1.0]),
        Sample::new(vec![1.0, 1.0], vec![0.0]),
    ]
}

fn weights(network: &Network) -> Vec<f64> {
    network
        .groups()
        .iter()
        .flat_map(|g| g.units())
        .flat_map(|u| std::iter::once(u.bias()).chain(u.connections().iter().map(|c| c.weight())))
        .collect()
}

#[test]
fn test_manual_construction() {
    init_logging();

    let mut network = Network::new();
    network
        .append(Group::new(2, Activation::Identity).unwrap())
        .append(Group::new(2, Activation::Relu).unwrap())
        .append(Group::new(1, Activation::Identity).unwrap());
    network.wire_all().unwrap();

    {
        let hidden = network.group_mut(1).unwrap().units_mut();
        hidden[0].connections_mut()[0].set_weight(1.0);
        hidden[1].connections_mut()[1].set_weight(1.0);
    }
    for connection in network.group_mut(2).unwrap().units_mut()[0].connections_mut() {
        connection.set_weight(1.0);
    }

    assert_eq!(network.run(&[1.0, -2.0]).unwrap(), vec![1.0]);
    assert_eq!(network.groups()[1].outputs(), vec![1.0, 0.0]);
}

#[test]
fn test_evolution_never_regresses_with_elitism() {
    init_logging();

    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let dataset = xor_dataset();

    let mut seed = Network::with_topology(&[
        (2, Activation::Identity),
        (4, Activation::Tanh),
        (1, Activation::Sigmoid),
    ])
    .unwrap();
    seed.randomize(&mut rng);

    // Initial population of independent candidates
    let mut population: Vec<Network> = (0..16)
        .map(|_| {
            let mut candidate = seed.clone();
            candidate.randomize(&mut rng);
            candidate
        })
        .collect();
    population
        .par_iter_mut()
        .try_for_each(|n| n.evaluate(&dataset).map(|_| ()))
        .unwrap();

    let best_error = |population: &[Network]| {
        population
            .iter()
            .map(Network::error)
            .fold(f64::INFINITY, f64::min)
    };
    let initial = best_error(&population);

    for _ in 0..30 {
        let mut children: Vec<Network> = population
            .iter()
            .map(|parent| {
                let mut child = parent.clone();
                child.evaluate(&dataset).unwrap();
                child.mutate(&mut rng).unwrap();
                child
            })
            .collect();

        children
            .par_iter_mut()
            .try_for_each(|n| n.evaluate(&dataset).map(|_| ()))
            .unwrap();

        population.extend(children);
        population.sort_by(|a, b| a.error().total_cmp(&b.error()));
        population.truncate(16);
    }

    let last = best_error(&population);
    assert!(last <= initial, "best error went from {} to {}", initial, last);
    assert!(population.iter().all(Network::is_valid));
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    init_logging();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let dataset = xor_dataset();
    let population: Vec<Network> = (0..8)
        .map(|_| {
            let mut n = Config::default().build().unwrap();
            n.randomize(&mut rng);
            n
        })
        .collect();

    let mut sequential = population.clone();
    for n in &mut sequential {
        n.evaluate(&dataset).unwrap();
    }

    let mut parallel = population;
    parallel.par_iter_mut().for_each(|n| {
        n.evaluate(&dataset).unwrap();
    });

    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.error(), b.error());
    }
}

#[test]
fn test_clone_then_mutate_leaves_parent_untouched() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut parent = Config::default().build().unwrap();
    parent.randomize(&mut rng);
    let before = weights(&parent);

    let mut child = parent.clone();
    for _ in 0..10 {
        child.mutate(&mut rng).unwrap();
    }

    assert_eq!(weights(&parent), before);
    assert_ne!(weights(&child), before);
    assert_eq!(child.run(&[0.2, 0.8]).unwrap().len(), 1);
}

#[test]
fn test_quantized_snapshots_compare_equal() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut a = Config::default().build().unwrap();
    a.randomize(&mut rng);

    let mut b = a.clone();
    // Nudge b below the rounding threshold
    let bias = b.groups()[2].units()[0].bias();
    b.group_mut(2).unwrap().units_mut()[0].set_bias(bias + 1e-9);

    assert_ne!(weights(&a), weights(&b));
    a.quantize(4);
    b.quantize(4);
    assert_eq!(weights(&a), weights(&b));
}

#[test]
fn test_brain_capability_interface() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut brain = Brain::from(Config::default().build().unwrap());
    brain.randomize(&mut rng);

    let dataset = xor_dataset();
    let error = brain.evaluate(&dataset).unwrap();
    assert_eq!(brain.error(), error);

    let mut child = brain.clone();
    assert_eq!(child.error(), Network::RESET_ERROR);
    child.evaluate(&dataset).unwrap();
    child.mutate(&mut rng).unwrap();
    child.quantize(6);
    assert!(child.network().is_valid());
}

#[test]
fn test_error_surfaces() {
    let mut network = Config::default().build().unwrap();

    assert_eq!(
        network.run(&[1.0]).unwrap_err(),
        NetworkError::ShapeMismatch { expected: 2, found: 1 }
    );
    assert_eq!(network.evaluate(&[]).unwrap_err(), NetworkError::EmptyDataset);
    assert!(matches!(
        Group::new(0, Activation::Tanh),
        Err(NetworkError::DegenerateTopology(_))
    ));
    assert!(matches!(
        "signoid".parse::<Activation>(),
        Err(NetworkError::UnknownActivation(_))
    ));
}

#[test]
fn test_config_file_roundtrip() {
    init_logging();

    let mut config = Config::default();
    config.seed = Some(2024);
    config.precision = Some(3);

    let path = std::env::temp_dir().join("evolvenet_test_config.yaml");
    config.save(&path).expect("Failed to save config");
    let loaded = Config::from_file(&path).expect("Failed to load config");

    let a = config.build_random(&mut config.rng()).unwrap();
    let b = loaded.build_random(&mut loaded.rng()).unwrap();
    assert_eq!(weights(&a), weights(&b));

    std::fs::remove_file(&path).ok();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Io(_))
    ));
}
