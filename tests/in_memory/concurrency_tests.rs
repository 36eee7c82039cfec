//! Concurrent registration, unregistration and queries.

use super::helpers::{counter, facade, name};
use palladio::{InMemoryManagementFacade, ObjectName};
use rstest::rstest;
use std::sync::Arc;
use std::thread;

const WRITERS: usize = 4;
const ROUNDS: usize = 25;

fn worker_name(writer: usize, round: usize) -> ObjectName {
    name(&format!("load:type=Counter,writer={writer},round={round}"))
}

#[rstest]
fn disjoint_writers_never_lose_registrations(facade: InMemoryManagementFacade) {
    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let shared = facade.clone();
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    shared
                        .register(worker_name(writer, round), Arc::new(counter("load")))
                        .expect("disjoint names register");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread completes");
    }

    assert_eq!(facade.managed_object_count(), WRITERS * ROUNDS);
    assert_eq!(
        facade.query_names(Some(&name("load:*")), None).len(),
        WRITERS * ROUNDS
    );
}

#[rstest]
fn queries_observe_consistent_snapshots(facade: InMemoryManagementFacade) {
    let stable = name("load:type=Counter,role=stable");
    facade
        .register(stable.clone(), Arc::new(counter("stable")))
        .expect("registers");

    let churn = {
        let shared = facade.clone();
        thread::spawn(move || {
            for round in 0..ROUNDS {
                let transient = worker_name(0, round);
                shared
                    .register(transient.clone(), Arc::new(counter("transient")))
                    .expect("registers");
                shared.unregister(&transient).expect("unregisters");
            }
        })
    };

    let pattern = name("load:*");
    for _ in 0..ROUNDS {
        let seen = facade.query_names(Some(&pattern), None);
        assert!(seen.contains(&stable));
        assert!(seen.len() <= 2, "at most one transient entry is visible");
    }
    churn.join().expect("churn thread completes");

    assert_eq!(facade.managed_object_count(), 1);
}

#[rstest]
fn only_one_racing_registration_wins(facade: InMemoryManagementFacade) {
    let contested = name("load:type=Counter,name=contested");
    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let shared = facade.clone();
            let target = contested.clone();
            thread::spawn(move || shared.register(target, Arc::new(counter("race"))).is_ok())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert!(facade.is_registered(&contested));
}
