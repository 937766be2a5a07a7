//! 交接信号
//!
//! 每个物种一个条件变量。被 floor 挡住的个体在自己物种的条件变量上等待，
//! floor 交给该物种时广播唤醒。

use sync::Condvar;

use crate::species::Species;

/// 两个物种各自的等待队列
#[derive(Debug)]
pub(crate) struct HandoffSignal {
    cats: Condvar,
    mice: Condvar,
}

impl HandoffSignal {
    pub(crate) const fn new() -> Self {
        Self {
            cats: Condvar::new(),
            mice: Condvar::new(),
        }
    }

    /// 物种的等待队列
    pub(crate) fn queue(&self, species: Species) -> &Condvar {
        match species {
            Species::Cat => &self.cats,
            Species::Mouse => &self.mice,
        }
    }

    /// 唤醒该物种的全部等待者
    ///
    /// 同一物种可以在不同的碗上并行进食，因此总是广播而不是只唤醒一个。
    pub(crate) fn wake_all(&self, species: Species) {
        self.queue(species).notify_all();
    }
}
