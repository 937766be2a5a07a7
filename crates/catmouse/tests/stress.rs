//! Many creatures, many rounds: exclusivity must hold at every admission and
//! every creature must finish.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use catmouse::{CatMouse, Species};
use common::Watcher;
use test_support::mock::sched;

fn run(bowls: usize, cats: usize, mice: usize, rounds: usize) -> (Arc<Watcher>, CatMouse) {
    sched::install();
    let engine = Arc::new(CatMouse::initialize(bowls).unwrap());
    let watcher = Arc::new(Watcher::new(bowls));
    let start = Arc::new(Barrier::new(cats + mice));

    let creatures = (0..cats)
        .map(|id| (Species::Cat, id))
        .chain((0..mice).map(|id| (Species::Mouse, id)));
    let handles: Vec<_> = creatures
        .map(|(species, id)| {
            let (engine, watcher, start) =
                (Arc::clone(&engine), Arc::clone(&watcher), Arc::clone(&start));
            thread::spawn(move || {
                sched::install();
                start.wait();
                for round in 0..rounds {
                    let bowl = (id + round) % bowls + 1;
                    engine.enter(species, bowl);
                    watcher.start(species, bowl);
                    thread::yield_now();
                    watcher.finish(species, bowl);
                    engine.leave(species, bowl);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    let engine = Arc::into_inner(engine).unwrap();
    (watcher, engine)
}

#[test]
fn test_many_bowls_many_creatures() {
    let (watcher, engine) = run(4, 6, 6, 40);
    assert_eq!(watcher.violations(), 0);
    assert!(watcher.max_eating(Species::Cat) <= 4);
    assert!(watcher.max_eating(Species::Mouse) <= 4);
    assert!(engine.snapshot().is_quiescent());
    engine.shutdown();
}

#[test]
fn test_more_bowls_than_creatures() {
    let (watcher, engine) = run(8, 2, 3, 50);
    assert_eq!(watcher.violations(), 0);
    engine.shutdown();
}

#[test]
fn test_single_species_never_hands_off() {
    let (watcher, engine) = run(3, 5, 0, 30);
    assert_eq!(watcher.violations(), 0);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.handoffs, 0);
    assert_eq!(snapshot.floor, Some(Species::Cat));
    engine.shutdown();
}
