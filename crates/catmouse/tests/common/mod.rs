//! Shared helpers for the catmouse integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use catmouse::Species;

/// Poll `cond` until it holds, panicking after a generous timeout.
pub fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !cond() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {}", what);
        }
        thread::sleep(Duration::from_millis(1));
    }
}

/// Give a blocked thread time to (wrongly) make progress before asserting it did not.
pub fn settle() {
    thread::sleep(Duration::from_millis(50));
}

/// Independent bookkeeping of who is eating, updated right after admission and right
/// before leaving. Records any observed violation instead of panicking inside workers.
pub struct Watcher {
    eating: [AtomicUsize; 2],
    bowls: Vec<AtomicBool>,
    violations: AtomicUsize,
    max_eating: [AtomicUsize; 2],
}

fn slot(species: Species) -> usize {
    match species {
        Species::Cat => 0,
        Species::Mouse => 1,
    }
}

impl Watcher {
    pub fn new(bowls: usize) -> Self {
        Self {
            eating: [AtomicUsize::new(0), AtomicUsize::new(0)],
            bowls: (0..bowls).map(|_| AtomicBool::new(false)).collect(),
            violations: AtomicUsize::new(0),
            max_eating: [AtomicUsize::new(0), AtomicUsize::new(0)],
        }
    }

    pub fn start(&self, species: Species, bowl: usize) {
        if self.bowls[bowl - 1].swap(true, Ordering::SeqCst) {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        let now = self.eating[slot(species)].fetch_add(1, Ordering::SeqCst) + 1;
        self.max_eating[slot(species)].fetch_max(now, Ordering::SeqCst);
        if self.eating[slot(species.other())].load(Ordering::SeqCst) > 0 {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn finish(&self, species: Species, bowl: usize) {
        self.eating[slot(species)].fetch_sub(1, Ordering::SeqCst);
        self.bowls[bowl - 1].store(false, Ordering::SeqCst);
    }

    pub fn violations(&self) -> usize {
        self.violations.load(Ordering::SeqCst)
    }

    pub fn max_eating(&self, species: Species) -> usize {
        self.max_eating[slot(species)].load(Ordering::SeqCst)
    }
}
