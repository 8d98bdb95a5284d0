use std::collections::HashSet;

use dsa_stepper::common::config::{MAX_CAPACITY, MAX_KEY, is_prime};
use dsa_stepper::common::exception::PlanError;
use dsa_stepper::container::hash_function::HashFunction;
use dsa_stepper::container::open_table::OpenTable;
use dsa_stepper::container::probe_sequence::{ProbeSequence, ProbeStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::logger::init_test_logger;

const PRIMES: [usize; 11] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31];

fn drain(mut seq: ProbeSequence) -> (Vec<usize>, usize) {
    let mut positions = Vec::new();
    loop {
        match seq.next_probe() {
            Ok(probe) => positions.push(probe.position),
            Err(exhausted) => return (positions, exhausted.attempts),
        }
    }
}

#[test]
fn linear_and_double_visit_every_slot_once() {
    init_test_logger();
    let mut rng = StdRng::seed_from_u64(7);

    for &capacity in &PRIMES {
        for _ in 0..20 {
            let key = rng.gen_range(0..1_000_000);
            for strategy in [ProbeStrategy::Linear, ProbeStrategy::Double] {
                let (positions, attempts) = drain(ProbeSequence::new(key, capacity, strategy));
                let distinct: HashSet<_> = positions.iter().copied().collect();
                assert_eq!(positions.len(), capacity, "{} key {}", strategy, key);
                assert_eq!(distinct.len(), capacity, "{} key {}", strategy, key);
                assert_eq!(attempts, capacity);
            }
        }
    }
}

#[test]
fn quadratic_never_repeats_before_exhaustion() {
    init_test_logger();
    let mut rng = StdRng::seed_from_u64(11);

    for &capacity in &PRIMES {
        for _ in 0..20 {
            let key = rng.gen_range(0..1_000_000);
            let (positions, _) = drain(ProbeSequence::new(key, capacity, ProbeStrategy::Quadratic));
            let distinct: HashSet<_> = positions.iter().copied().collect();
            assert_eq!(distinct.len(), positions.len(), "capacity {}", capacity);
            assert_eq!(positions.len(), capacity / 2 + 1, "capacity {}", capacity);
        }
    }
}

#[test]
fn first_position_is_home_hash() {
    let mut rng = StdRng::seed_from_u64(3);
    for &capacity in &PRIMES {
        let key = rng.gen_range(0..1_000_000);
        for strategy in [
            ProbeStrategy::Linear,
            ProbeStrategy::Quadratic,
            ProbeStrategy::Double,
        ] {
            let mut seq = ProbeSequence::new(key, capacity, strategy);
            assert_eq!(seq.next().map(|p| p.position), Some(key as usize % capacity));
        }
    }
}

#[test]
fn double_hash_step_stays_in_range() {
    for size in 2..60 {
        if !is_prime(size) {
            continue;
        }
        let hash_fn = HashFunction::new(size);
        for key in 0..200 {
            let step = hash_fn.get_step(key);
            assert!(step >= 1, "size {} key {}", size, key);
            assert!(step < size, "size {} key {}", size, key);
        }
    }
}

#[test]
fn largest_table_probes_without_overflow() {
    init_test_logger();
    assert!(is_prime(MAX_CAPACITY));

    for strategy in [
        ProbeStrategy::Linear,
        ProbeStrategy::Quadratic,
        ProbeStrategy::Double,
    ] {
        let (positions, _) = drain(ProbeSequence::new(MAX_KEY, MAX_CAPACITY, strategy));
        assert!(positions.iter().all(|&p| p < MAX_CAPACITY), "{}", strategy);
    }
    assert_eq!(
        OpenTable::new(MAX_CAPACITY + 2, ProbeStrategy::Linear),
        Err(PlanError::InvalidCapacity(MAX_CAPACITY + 2))
    );
}
