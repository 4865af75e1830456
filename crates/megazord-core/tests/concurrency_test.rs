//! Concurrent first-use tests.
//!
//! Many binding modules may resolve at the same time with no coordinator.
//! Exactly one library may ever be committed.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use megazord_core::{ComponentIdentity, Megazord, MegazordError, MegazordRegistry, StaticLoader};

const THREADS: usize = 16;

#[test]
fn test_concurrent_resolution_commits_once() {
    let mz = Arc::new(Megazord::new(
        Arc::new(MegazordRegistry::new()),
        Arc::new(StaticLoader::new()),
    ));
    mz.configure("libA", "1.0");

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mz = mz.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                mz.resolve(&ComponentIdentity::new(format!("component-{}", i), "1.0"))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "libA");
    }
    assert_eq!(mz.library_in_use(), Some("libA".to_string()));
}

#[test]
fn test_concurrent_commits_agree() {
    let registry = Arc::new(MegazordRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.commit_in_use(&format!("lib{}", i))
            })
        })
        .collect();

    let observed: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Every caller sees the same single winner.
    assert_eq!(observed.len(), 1);
    assert_eq!(registry.in_use().as_ref(), observed.iter().next());
}

#[test]
fn test_concurrent_reconfiguration_never_double_commits() {
    // Threads race resolutions while the configured library flips. Whatever
    // wins the commit, every success must name it and every other outcome
    // must be MultipleAggregatesInUse.
    let registry = Arc::new(MegazordRegistry::new());
    let mz = Arc::new(Megazord::new(registry.clone(), Arc::new(StaticLoader::new())));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mz = mz.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let library = if i % 2 == 0 { "libA" } else { "libB" };
                barrier.wait();
                mz.configure(library, "1.0");
                mz.resolve(&ComponentIdentity::new(format!("component-{}", i), "1.0"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let committed = registry.in_use().expect("some resolution must commit");

    for result in results {
        match result {
            Ok(library) => assert_eq!(library, committed),
            Err(MegazordError::MultipleAggregatesInUse { in_use, .. }) => {
                assert_eq!(in_use, committed)
            }
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}
