//! 准入控制器
//!
//! 四个入口（猫进食前/后、老鼠进食前/后）实现准入、释放和 floor 交接协议。
//!
//! # 进食前（enter）
//!
//! 1. 本物种等待数加一
//! 2. 占用目标碗（可能因同一个碗上的任何个体而阻塞）
//! 3. floor 未设置，或另一物种空闲时，占有 floor
//! 4. floor 不属于本物种，或另一物种仍有进食者时，在本物种队列上等待，
//!    醒来后重新检查
//! 5. 等待数减一，进食数加一
//!
//! # 进食后（leave）
//!
//! 1. 本物种进食数减一
//! 2. 若本物种已无进食者和等待者，而另一物种有等待者，则把 floor 交给另一物种
//!    并唤醒其全部等待者
//! 3. 释放碗
//!
//! 第 3、4 步与第 5 步的判断和计数更新都在 [`ClassState::lock_all`] 之下完成，
//! 入队也在同一把锁下进行，交接时的广播因此不会丢失。

use log::{debug, info, trace};

use crate::bowls::Bowls;
use crate::error::InitError;
use crate::handoff::HandoffSignal;
use crate::species::Species;
use crate::state::{ClassState, Snapshot};

/// 猫鼠同步引擎
///
/// 由 [`CatMouse::initialize`] 创建，由 [`CatMouse::shutdown`] 销毁。
/// 多个线程通过 `Arc<CatMouse>` 或 `&CatMouse` 共享同一个实例。
#[derive(Debug)]
pub struct CatMouse {
    bowls: Bowls,
    state: ClassState,
    handoff: HandoffSignal,
}

impl CatMouse {
    /// 创建拥有 `bowls` 个碗的引擎，所有计数器为零，floor 未设置
    pub fn initialize(bowls: usize) -> Result<Self, InitError> {
        let bowls = Bowls::new(bowls)?;
        info!("catmouse: initialized with {} bowls", bowls.len());
        Ok(Self {
            bowls,
            state: ClassState::new(),
            handoff: HandoffSignal::new(),
        })
    }

    /// 碗的数量
    pub fn bowl_count(&self) -> usize {
        self.bowls.len()
    }

    /// 计数器与 floor 的一致快照
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock_all().snapshot()
    }

    /// `species` 的个体准备在 `bowl` 进食，阻塞直到获准
    ///
    /// 返回时调用者独占该碗，并计入本物种的进食数。
    ///
    /// # Panics
    /// - `bowl` 不在 `1..=bowl_count()` 范围内
    /// - 调用者已经占用着该碗
    pub fn enter(&self, species: Species, bowl: usize) {
        let lock = self.bowls.lock_for(bowl);
        if lock.is_held_by_current() {
            panic!("catmouse: {} re-entering bowl {} it already holds", species, bowl);
        }

        self.state.counters(species).lock().waiting += 1;
        trace!("{} waiting for bowl {}", species, bowl);

        lock.acquire();
        let queue = self.handoff.queue(species);
        loop {
            let mut state = self.state.lock_all();
            if state.claim_floor(species) {
                // 先前因 floor 被挡住的同类需要重新检查
                self.handoff.wake_all(species);
            }

            if state.may_admit(species) {
                let mine = state.counters_mut(species);
                mine.waiting -= 1;
                mine.eating += 1;
                let snapshot = state.snapshot();
                drop(state);
                debug!(
                    "{} eating at bowl {} ({} cats, {} mice eating)",
                    species, bowl, snapshot.cats.eating, snapshot.mice.eating
                );
                return;
            }

            let ticket = queue.enqueue();
            drop(state);
            trace!("{} at bowl {} blocked by {}", species, bowl, species.other());
            queue.wait_ticket(ticket, lock);
        }
    }

    /// `species` 的个体在 `bowl` 进食完毕
    ///
    /// # Panics
    /// - `bowl` 不在 `1..=bowl_count()` 范围内
    /// - 调用者没有占用该碗
    /// - 本物种没有进食者（重复离开）
    pub fn leave(&self, species: Species, bowl: usize) {
        let lock = self.bowls.lock_for(bowl);
        if !lock.is_held_by_current() {
            panic!("catmouse: {} leaving bowl {} it does not hold", species, bowl);
        }

        let other = species.other();
        let handed_off = {
            let mut state = self.state.lock_all();
            let mine = state.counters_mut(species);
            if mine.eating == 0 {
                panic!("catmouse: {} leaving bowl {} with no {} eating", species, bowl, species);
            }
            mine.eating -= 1;

            let drained = mine.is_idle();
            if drained && state.counters(other).waiting > 0 {
                state.hand_floor_to(other);
                self.handoff.wake_all(other);
                true
            } else {
                false
            }
        };
        lock.release();

        if handed_off {
            debug!("last {} left bowl {}, floor handed to {}", species, bowl, other);
        } else {
            trace!("{} left bowl {}", species, bowl);
        }
    }

    /// 猫准备在 `bowl` 进食
    pub fn cat_before_eating(&self, bowl: usize) {
        self.enter(Species::Cat, bowl);
    }

    /// 猫在 `bowl` 进食完毕
    pub fn cat_after_eating(&self, bowl: usize) {
        self.leave(Species::Cat, bowl);
    }

    /// 老鼠准备在 `bowl` 进食
    pub fn mouse_before_eating(&self, bowl: usize) {
        self.enter(Species::Mouse, bowl);
    }

    /// 老鼠在 `bowl` 进食完毕
    pub fn mouse_after_eating(&self, bowl: usize) {
        self.leave(Species::Mouse, bowl);
    }

    /// 销毁引擎
    ///
    /// # Panics
    /// 仍有个体在进食或等待时 panic。
    pub fn shutdown(self) {
        let snapshot = self.snapshot();
        if !snapshot.is_quiescent() {
            panic!("catmouse: shutdown while busy: {:?}", snapshot);
        }
        info!(
            "catmouse: shut down {} bowls after {} handoffs",
            self.bowls.len(),
            snapshot.handoffs
        );
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !cond() {
            assert!(Instant::now() < deadline, "timed out waiting for {}", what);
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// 猫和老鼠在任何一方检查准入之前都已登记为等待者，floor 仍未设置
    #[test]
    fn test_simultaneous_arrival_on_unset_floor() {
        test_support::mock::sched::install();
        let engine = Arc::new(CatMouse::initialize(2).unwrap());
        let done = Arc::new(AtomicUsize::new(0));

        // 占住 1 号碗，让猫在等待数加一之后停在碗锁上
        let bowl = engine.bowls.lock_for(1);
        bowl.acquire();

        let cat = {
            let (engine, done) = (Arc::clone(&engine), Arc::clone(&done));
            thread::spawn(move || {
                engine.enter(Species::Cat, 1);
                engine.leave(Species::Cat, 1);
                done.fetch_add(1, Ordering::SeqCst);
            })
        };
        wait_until("cat registered as waiting", || {
            engine.snapshot().cats.waiting == 1
        });
        assert_eq!(engine.snapshot().floor, None);

        let mouse = {
            let (engine, done) = (Arc::clone(&engine), Arc::clone(&done));
            thread::spawn(move || {
                engine.enter(Species::Mouse, 2);
                engine.leave(Species::Mouse, 2);
                done.fetch_add(1, Ordering::SeqCst);
            })
        };

        // 老鼠先拿到状态锁，占有未设置的 floor；离开时猫仍在等待，floor 交给猫
        wait_until("mouse finished", || done.load(Ordering::SeqCst) == 1);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.floor, Some(Species::Cat));
        assert_eq!(snapshot.handoffs, 1);
        assert_eq!(snapshot.cats.waiting, 1);

        bowl.release();
        wait_until("cat finished", || done.load(Ordering::SeqCst) == 2);
        cat.join().unwrap();
        mouse.join().unwrap();

        let engine = Arc::into_inner(engine).unwrap();
        let snapshot = engine.snapshot();
        assert!(snapshot.is_quiescent());
        assert_eq!(snapshot.floor, Some(Species::Cat));
        engine.shutdown();
    }

    #[test]
    fn test_first_admission_sets_floor() {
        test_support::mock::sched::install();
        let engine = CatMouse::initialize(1).unwrap();
        engine.mouse_before_eating(1);
        assert_eq!(engine.snapshot().floor, Some(Species::Mouse));
        engine.mouse_after_eating(1);
        engine.shutdown();
    }
}
