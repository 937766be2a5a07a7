//! 裁判：独立于引擎记录实际进食情况并统计违规

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use catmouse::Species;

const EMPTY: u8 = 0;

fn tag(species: Species) -> u8 {
    match species {
        Species::Cat => 1,
        Species::Mouse => 2,
    }
}

#[derive(Debug, Default)]
struct SpeciesTally {
    eating: AtomicUsize,
    max_eating: AtomicUsize,
    meals: AtomicUsize,
}

/// 裁判
///
/// 每个碗记录当前占用者，每个物种记录正在进食数。引擎放行后调用
/// [`Referee::start_meal`]，离开前调用 [`Referee::end_meal`]。
#[derive(Debug)]
pub struct Referee {
    bowls: Box<[AtomicU8]>,
    cats: SpeciesTally,
    mice: SpeciesTally,
    bowl_violations: AtomicUsize,
    species_violations: AtomicUsize,
}

impl Referee {
    /// 为 `bowls` 个碗创建裁判
    pub fn new(bowls: usize) -> Self {
        Self {
            bowls: (0..bowls).map(|_| AtomicU8::new(EMPTY)).collect(),
            cats: SpeciesTally::default(),
            mice: SpeciesTally::default(),
            bowl_violations: AtomicUsize::new(0),
            species_violations: AtomicUsize::new(0),
        }
    }

    fn tally(&self, species: Species) -> &SpeciesTally {
        match species {
            Species::Cat => &self.cats,
            Species::Mouse => &self.mice,
        }
    }

    fn slot(&self, bowl: usize) -> &AtomicU8 {
        &self.bowls[bowl - 1]
    }

    /// 记录 `species` 开始在 `bowl`（1 起编号）进食
    pub fn start_meal(&self, species: Species, bowl: usize) {
        let tally = self.tally(species);
        let now = tally.eating.fetch_add(1, Ordering::SeqCst) + 1;
        tally.max_eating.fetch_max(now, Ordering::Relaxed);

        if self.tally(species.other()).eating.load(Ordering::SeqCst) != 0 {
            self.species_violations.fetch_add(1, Ordering::Relaxed);
            log::error!("referee: {} started eating while the other species is eating", species);
        }
        if self
            .slot(bowl)
            .compare_exchange(EMPTY, tag(species), Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.bowl_violations.fetch_add(1, Ordering::Relaxed);
            log::error!("referee: bowl {} already occupied when {} arrived", bowl, species);
        }
    }

    /// 记录 `species` 结束在 `bowl` 的进食
    pub fn end_meal(&self, species: Species, bowl: usize) {
        if self
            .slot(bowl)
            .compare_exchange(tag(species), EMPTY, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.bowl_violations.fetch_add(1, Ordering::Relaxed);
            log::error!("referee: bowl {} not held by {} at end of meal", bowl, species);
        }
        let tally = self.tally(species);
        tally.eating.fetch_sub(1, Ordering::SeqCst);
        tally.meals.fetch_add(1, Ordering::Relaxed);
    }

    /// 已完成的进食次数
    pub fn meals(&self, species: Species) -> usize {
        self.tally(species).meals.load(Ordering::Relaxed)
    }

    /// 观察到的最大同时进食数
    pub fn max_eating(&self, species: Species) -> usize {
        self.tally(species).max_eating.load(Ordering::Relaxed)
    }

    /// 同一个碗被两个个体同时占用的次数
    pub fn bowl_violations(&self) -> usize {
        self.bowl_violations.load(Ordering::Relaxed)
    }

    /// 两个物种同时进食的次数
    pub fn species_violations(&self) -> usize {
        self.species_violations.load(Ordering::Relaxed)
    }
}
