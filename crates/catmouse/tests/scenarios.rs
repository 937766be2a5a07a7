//! Admission, exclusion and handoff behaviour under real threads.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use catmouse::{CatMouse, Species};
use common::{Watcher, settle, wait_until};
use test_support::mock::sched;

/// An agent thread that enters, reports admission, and leaves only when told to.
struct Agent {
    admitted: Arc<AtomicBool>,
    leave: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Agent {
    fn spawn(engine: &Arc<CatMouse>, species: Species, bowl: usize) -> Self {
        let engine = Arc::clone(engine);
        let admitted = Arc::new(AtomicBool::new(false));
        let (leave, go) = mpsc::channel::<()>();
        let flag = Arc::clone(&admitted);
        let handle = thread::spawn(move || {
            sched::install();
            engine.enter(species, bowl);
            flag.store(true, Ordering::SeqCst);
            go.recv().unwrap();
            engine.leave(species, bowl);
        });
        Self {
            admitted,
            leave,
            handle,
        }
    }

    fn is_admitted(&self) -> bool {
        self.admitted.load(Ordering::SeqCst)
    }

    fn finish(self) {
        self.leave.send(()).unwrap();
        self.handle.join().unwrap();
    }
}

#[test]
fn test_uncontended_enter_does_not_block() {
    sched::install();
    let engine = CatMouse::initialize(1).unwrap();

    let yields = sched::current_yields();
    engine.enter(Species::Cat, 1);
    assert_eq!(sched::current_yields(), yields);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.cats.eating, 1);
    assert_eq!(snapshot.cats.waiting, 0);
    assert_eq!(snapshot.floor, Some(Species::Cat));

    engine.leave(Species::Cat, 1);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.cats.eating, 0);
    assert!(snapshot.is_quiescent());
    // 交接只在有对方等待者时发生
    assert_eq!(snapshot.handoffs, 0);

    engine.shutdown();
}

#[test]
fn test_named_entry_points() {
    sched::install();
    let engine = CatMouse::initialize(2).unwrap();

    engine.mouse_before_eating(2);
    assert_eq!(engine.snapshot().mice.eating, 1);
    engine.mouse_after_eating(2);

    engine.cat_before_eating(1);
    assert_eq!(engine.snapshot().floor, Some(Species::Cat));
    engine.cat_after_eating(1);

    engine.shutdown();
}

#[test]
fn test_other_species_blocked_despite_free_bowl() {
    sched::install();
    let engine = Arc::new(CatMouse::initialize(2).unwrap());

    let cat = Agent::spawn(&engine, Species::Cat, 1);
    wait_until("cat admitted", || cat.is_admitted());

    let mouse = Agent::spawn(&engine, Species::Mouse, 2);
    wait_until("mouse waiting", || engine.snapshot().mice.waiting == 1);
    settle();
    assert!(!mouse.is_admitted());
    assert_eq!(engine.snapshot().mice.eating, 0);

    cat.finish();
    wait_until("mouse admitted", || mouse.is_admitted());

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.floor, Some(Species::Mouse));
    assert_eq!(snapshot.handoffs, 1);
    assert_eq!(snapshot.cats.eating, 0);

    mouse.finish();
    Arc::into_inner(engine).unwrap().shutdown();
}

#[test]
fn test_handoff_waits_for_same_species_waiters() {
    sched::install();
    let engine = Arc::new(CatMouse::initialize(2).unwrap());

    let first_cat = Agent::spawn(&engine, Species::Cat, 1);
    wait_until("first cat admitted", || first_cat.is_admitted());

    let mouse = Agent::spawn(&engine, Species::Mouse, 2);
    wait_until("mouse waiting", || engine.snapshot().mice.waiting == 1);

    // 第二只猫排在同一个碗上
    let second_cat = Agent::spawn(&engine, Species::Cat, 1);
    wait_until("second cat waiting", || engine.snapshot().cats.waiting == 1);

    first_cat.finish();
    wait_until("second cat admitted", || second_cat.is_admitted());
    settle();
    assert!(!mouse.is_admitted());
    assert_eq!(engine.snapshot().floor, Some(Species::Cat));

    second_cat.finish();
    wait_until("mouse admitted", || mouse.is_admitted());
    assert_eq!(engine.snapshot().handoffs, 1);

    mouse.finish();
    Arc::into_inner(engine).unwrap().shutdown();
}

#[test]
fn test_mouse_admitted_only_after_both_cats_leave() {
    sched::install();
    for first_out in [0usize, 1] {
        let engine = Arc::new(CatMouse::initialize(3).unwrap());

        let mut cats = vec![
            Agent::spawn(&engine, Species::Cat, 1),
            Agent::spawn(&engine, Species::Cat, 2),
        ];
        wait_until("both cats admitted", || cats.iter().all(Agent::is_admitted));
        assert_eq!(engine.snapshot().cats.eating, 2);

        let mouse = Agent::spawn(&engine, Species::Mouse, 3);
        wait_until("mouse waiting", || engine.snapshot().mice.waiting == 1);

        cats.remove(first_out).finish();
        settle();
        assert!(!mouse.is_admitted(), "mouse admitted after only one cat left");
        assert_eq!(engine.snapshot().floor, Some(Species::Cat));

        cats.remove(0).finish();
        wait_until("mouse admitted", || mouse.is_admitted());
        assert_eq!(engine.snapshot().floor, Some(Species::Mouse));

        mouse.finish();
        Arc::into_inner(engine).unwrap().shutdown();
    }
}

#[test]
fn test_same_species_shares_distinct_bowls() {
    sched::install();
    let engine = Arc::new(CatMouse::initialize(3).unwrap());

    let mice: Vec<_> = (1..=3)
        .map(|bowl| Agent::spawn(&engine, Species::Mouse, bowl))
        .collect();
    wait_until("all mice admitted", || mice.iter().all(Agent::is_admitted));
    assert_eq!(engine.snapshot().mice.eating, 3);

    for mouse in mice {
        mouse.finish();
    }
    Arc::into_inner(engine).unwrap().shutdown();
}

#[test]
fn test_broadcast_admits_every_waiting_mouse() {
    sched::install();
    let engine = Arc::new(CatMouse::initialize(4).unwrap());

    let cat = Agent::spawn(&engine, Species::Cat, 1);
    wait_until("cat admitted", || cat.is_admitted());

    let mice: Vec<_> = (2..=4)
        .map(|bowl| Agent::spawn(&engine, Species::Mouse, bowl))
        .collect();
    wait_until("mice waiting", || engine.snapshot().mice.waiting == 3);

    cat.finish();
    wait_until("all mice admitted", || mice.iter().all(Agent::is_admitted));
    assert_eq!(engine.snapshot().mice.eating, 3);
    assert_eq!(engine.snapshot().handoffs, 1);

    for mouse in mice {
        mouse.finish();
    }
    Arc::into_inner(engine).unwrap().shutdown();
}

#[test]
fn test_interleaved_bursts_on_one_bowl_all_complete() {
    sched::install();
    let engine = Arc::new(CatMouse::initialize(1).unwrap());
    let watcher = Arc::new(Watcher::new(1));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let species = if i % 2 == 0 { Species::Cat } else { Species::Mouse };
            let (engine, watcher) = (Arc::clone(&engine), Arc::clone(&watcher));
            thread::spawn(move || {
                sched::install();
                engine.enter(species, 1);
                watcher.start(species, 1);
                thread::sleep(Duration::from_millis(2));
                watcher.finish(species, 1);
                engine.leave(species, 1);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(watcher.violations(), 0);
    assert_eq!(watcher.max_eating(Species::Cat), 1);
    assert!(engine.snapshot().is_quiescent());
    Arc::into_inner(engine).unwrap().shutdown();
}
