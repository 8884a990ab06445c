//! Concurrency tests for Set.
//!
//! These tests hammer shared sets from several threads and check that no
//! update is lost and that combining the same pair of sets in opposite
//! roles does not deadlock.

use lockset::Set;
use rstest::rstest;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const VALUES_PER_THREAD: usize = 1_000;

#[rstest]
fn test_concurrent_disjoint_adds_lose_nothing() {
    let set = Set::new();

    let handles: Vec<_> = (0..THREADS)
        .map(|index| {
            let set = set.clone();
            thread::spawn(move || {
                let start = index * VALUES_PER_THREAD;
                for value in start..start + VALUES_PER_THREAD {
                    set.add([value]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(set.size(), THREADS * VALUES_PER_THREAD);
}

#[rstest]
fn test_concurrent_overlapping_adds_stay_unique() {
    let set = Arc::new(Set::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let set = Arc::clone(&set);
            thread::spawn(move || set.add(0..VALUES_PER_THREAD))
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(set.size(), VALUES_PER_THREAD);
}

#[rstest]
fn test_concurrent_add_and_discard() {
    let set: Set<usize> = (0..VALUES_PER_THREAD).collect();

    let remover = {
        let set = set.clone();
        thread::spawn(move || {
            for value in (0..VALUES_PER_THREAD).filter(|value| value % 2 == 0) {
                set.discard([value]);
            }
        })
    };
    let adder = {
        let set = set.clone();
        thread::spawn(move || set.add(VALUES_PER_THREAD..2 * VALUES_PER_THREAD))
    };

    remover.join().expect("Thread panicked");
    adder.join().expect("Thread panicked");

    assert_eq!(set.size(), VALUES_PER_THREAD / 2 + VALUES_PER_THREAD);
    assert!(!set.has(&0));
    assert!(set.has(&1));
}

#[rstest]
fn test_opposite_role_operations_do_not_deadlock() {
    let set_a: Set<usize> = (0..200).collect();
    let set_b: Set<usize> = (100..300).collect();
    let barrier = Arc::new(Barrier::new(2));

    let forward = {
        let (set_a, set_b, barrier) = (set_a.clone(), set_b.clone(), Arc::clone(&barrier));
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..500 {
                assert_eq!(set_a.union(&set_b).size(), 300);
                assert_eq!(set_a.intersection(&set_b).size(), 100);
                assert!(!set_a.subset_of(&set_b));
            }
        })
    };
    let backward = {
        let (set_a, set_b, barrier) = (set_a.clone(), set_b.clone(), Arc::clone(&barrier));
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..500 {
                assert_eq!(set_b.union(&set_a).size(), 300);
                assert_eq!(set_b.disjoint(&set_a).size(), 200);
                assert!(!set_b.superset_of(&set_a));
            }
        })
    };

    forward.join().expect("Thread panicked");
    backward.join().expect("Thread panicked");
}

#[rstest]
fn test_opposite_role_mutations_do_not_deadlock() {
    let set_a: Set<usize> = (0..100).collect();
    let set_b: Set<usize> = (50..150).collect();

    let handles: Vec<_> = (0..THREADS)
        .map(|index| {
            let (set_a, set_b) = (set_a.clone(), set_b.clone());
            thread::spawn(move || {
                for _ in 0..200 {
                    if index % 2 == 0 {
                        set_a.extend(&set_b);
                    } else {
                        set_b.extend(&set_a);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(set_a.equal_to(&set_b));
    assert_eq!(set_a.size(), 150);
}

#[rstest]
fn test_operations_see_consistent_snapshots() {
    let set = Set::new();
    let writer = {
        let set = set.clone();
        thread::spawn(move || {
            for round in 0..500 {
                set.add([round * 2, round * 2 + 1]);
            }
        })
    };

    for _ in 0..500 {
        let snapshot = set.values();
        // pairs are added under one lock, so a snapshot never holds half a pair
        assert_eq!(snapshot.len() % 2, 0);
    }

    writer.join().expect("Thread panicked");
    assert_eq!(set.size(), 1_000);
}
