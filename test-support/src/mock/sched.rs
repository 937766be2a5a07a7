//! 调度操作的 Mock 实现
//!
//! 每个 std 线程分配一个非零标识；`yield_now` 委托给 `std::thread::yield_now`，
//! 并记录调用次数，测试可借此判断某个操作是否发生过阻塞。

use std::cell::Cell;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

use sync::SchedOps;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static THREAD_ID: usize = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    static THREAD_YIELDS: Cell<usize> = const { Cell::new(0) };
}

/// Mock 调度操作
pub struct MockSchedOps {
    total_yields: AtomicUsize,
}

impl MockSchedOps {
    pub const fn new() -> Self {
        Self {
            total_yields: AtomicUsize::new(0),
        }
    }

    /// 所有线程累计的让出次数
    pub fn total_yields(&self) -> usize {
        self.total_yields.load(Ordering::Relaxed)
    }
}

impl Default for MockSchedOps {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedOps for MockSchedOps {
    fn current_id(&self) -> usize {
        THREAD_ID.with(|id| *id)
    }

    fn yield_now(&self) {
        THREAD_YIELDS.with(|count| count.set(count.get() + 1));
        self.total_yields.fetch_add(1, Ordering::Relaxed);
        std::thread::yield_now();
    }
}

/// 全局 Mock 实例
pub static MOCK_SCHED_OPS: MockSchedOps = MockSchedOps::new();

static INSTALL: Once = Once::new();

/// 注册 [`MOCK_SCHED_OPS`]，可重复调用
pub fn install() {
    INSTALL.call_once(|| unsafe { sync::register_sched_ops(&MOCK_SCHED_OPS) });
}

/// 当前线程累计的让出次数
pub fn current_yields() -> usize {
    THREAD_YIELDS.with(|count| count.get())
}
