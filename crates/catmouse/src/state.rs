//! 物种状态
//!
//! 每个物种一把自旋锁保护自己的计数器，另有一把自旋锁保护"发言权"（floor）。
//!
//! # 锁顺序
//!
//! 需要同时持有多把状态锁时，必须按 猫计数器 → 鼠计数器 → floor 的顺序获取，
//! 统一通过 [`ClassState::lock_all`] 完成。状态锁可以在持有碗锁时获取，
//! 反之不允许：持有任何状态锁时不得获取碗锁或在条件变量上挂起。

use sync::{SpinLock, SpinLockGuard};

use crate::species::Species;

/// 单个物种的计数器
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassCounters {
    /// 已通过准入、正在进食的个体数
    pub eating: usize,
    /// 已调用 enter 但尚未通过准入的个体数
    pub waiting: usize,
}

impl ClassCounters {
    /// 既没有进食者也没有等待者
    pub fn is_idle(&self) -> bool {
        self.eating == 0 && self.waiting == 0
    }
}

/// floor 及其交接次数
#[derive(Debug, Default, Clone, Copy)]
struct FloorState {
    holder: Option<Species>,
    handoffs: usize,
}

/// 某一时刻两个物种计数器和 floor 的一致快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// 猫的计数器
    pub cats: ClassCounters,
    /// 老鼠的计数器
    pub mice: ClassCounters,
    /// 当前持有 floor 的物种，第一次准入之前为 `None`
    pub floor: Option<Species>,
    /// 离开时发生的 floor 交接次数
    pub handoffs: usize,
}

impl Snapshot {
    /// 指定物种的计数器
    pub fn counters(&self, species: Species) -> ClassCounters {
        match species {
            Species::Cat => self.cats,
            Species::Mouse => self.mice,
        }
    }

    /// 四个计数器是否全为零
    pub fn is_quiescent(&self) -> bool {
        self.cats.is_idle() && self.mice.is_idle()
    }
}

/// 两个物种共享的状态
#[derive(Debug)]
pub(crate) struct ClassState {
    cats: SpinLock<ClassCounters>,
    mice: SpinLock<ClassCounters>,
    floor: SpinLock<FloorState>,
}

impl ClassState {
    pub(crate) fn new() -> Self {
        Self {
            cats: SpinLock::new(ClassCounters::default()),
            mice: SpinLock::new(ClassCounters::default()),
            floor: SpinLock::new(FloorState::default()),
        }
    }

    /// 单个物种的计数器锁，仅用于不涉及另一物种的简单更新
    pub(crate) fn counters(&self, species: Species) -> &SpinLock<ClassCounters> {
        match species {
            Species::Cat => &self.cats,
            Species::Mouse => &self.mice,
        }
    }

    /// 按锁顺序获取全部状态锁
    pub(crate) fn lock_all(&self) -> StateGuard<'_> {
        let cats = self.cats.lock();
        let mice = self.mice.lock();
        let floor = self.floor.lock();
        StateGuard { cats, mice, floor }
    }
}

/// 同时持有全部状态锁的保护器
pub(crate) struct StateGuard<'a> {
    cats: SpinLockGuard<'a, ClassCounters>,
    mice: SpinLockGuard<'a, ClassCounters>,
    floor: SpinLockGuard<'a, FloorState>,
}

impl StateGuard<'_> {
    pub(crate) fn counters(&self, species: Species) -> &ClassCounters {
        match species {
            Species::Cat => &*self.cats,
            Species::Mouse => &*self.mice,
        }
    }

    pub(crate) fn counters_mut(&mut self, species: Species) -> &mut ClassCounters {
        match species {
            Species::Cat => &mut *self.cats,
            Species::Mouse => &mut *self.mice,
        }
    }

    /// 由 `species` 占有 floor，返回 floor 是否因此改变
    ///
    /// floor 未设置时总能占有，先拿到 [`ClassState::lock_all`] 的一方获胜；
    /// 被另一物种持有时，只有该物种已经空闲才能占有。
    pub(crate) fn claim_floor(&mut self, species: Species) -> bool {
        let claimable = match self.floor.holder {
            None => true,
            Some(holder) if holder == species => false,
            Some(_) => self.counters(species.other()).is_idle(),
        };
        if claimable {
            self.floor.holder = Some(species);
        }
        claimable
    }

    /// 离开时把 floor 交给另一物种
    pub(crate) fn hand_floor_to(&mut self, species: Species) {
        self.floor.holder = Some(species);
        self.floor.handoffs += 1;
    }

    /// `species` 现在能否开始进食
    ///
    /// floor 属于 `species`，且另一物种没有个体在进食。
    pub(crate) fn may_admit(&self, species: Species) -> bool {
        self.floor.holder == Some(species) && self.counters(species.other()).eating == 0
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            cats: *self.cats,
            mice: *self.mice,
            floor: self.floor.holder,
            handoffs: self.floor.handoffs,
        }
    }
}
